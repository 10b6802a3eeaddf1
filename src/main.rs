//! Command line interface of mutwick.
//!
//! ```bash
//! # Condense a tree to 1000 nodes, weighting lineages by case counts
//! mutwick prune tree.pb pruned.pb --max-nodes 1000 --weights counts.json --renames renames.json
//!
//! # Replace lineage labels by fine addresses
//! mutwick refine pruned.pb refined.pb --fine-to-coarse fine_to_coarse.json
//!
//! # Print the mutations of every lineage
//! mutwick lineages refined.pb
//!
//! # Print the sequence of one lineage
//! mutwick apply refined.pb reference.txt fine.0.3
//!
//! # More output
//! RUST_LOG=mutwick=debug mutwick -v refine pruned.pb refined.pb
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use mutwick::Error;
use mutwick::model::overlay;
use mutwick::usher;

#[derive(Debug, Parser)]
#[command(name = "mutwick", version, about = "Prune and refine mutation-annotated trees")]
struct Cli {
    /// Increase log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Condense a tree to at most `max_nodes` nodes
    Prune {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        max_nodes: usize,
        /// JSON object mapping lineage labels to weights
        #[arg(long)]
        weights: Option<PathBuf>,
        /// Where to write the JSON map of removed lineages to their survivors
        #[arg(long)]
        renames: Option<PathBuf>,
    },
    /// Relabel a tree with fine addresses
    Refine {
        input: PathBuf,
        output: PathBuf,
        /// Where to write the JSON map of fine addresses to coarse lineages
        #[arg(long)]
        fine_to_coarse: Option<PathBuf>,
    },
    /// Print the mutations of each lineage as JSON
    Lineages { input: PathBuf },
    /// Print the sequence of a lineage
    Apply {
        input: PathBuf,
        /// Text file with the reference sequence; whitespace is ignored
        reference: PathBuf,
        lineage: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(command: Command) -> Result<ExitCode, Error> {
    match command {
        Command::Prune {
            input,
            output,
            max_nodes,
            weights,
            renames,
        } => {
            let weights = weights
                .map(|path| -> Result<HashMap<String, f64>, Error> {
                    Ok(serde_json::from_slice(&fs::read(path)?)?)
                })
                .transpose()?;
            let report = mutwick::prune_file(&input, &output, max_nodes, weights)?;
            info!(num_pruned = report.num_pruned, "Done");
            if let Some(path) = renames {
                write_json(&path, &report.renames)?;
            }
        }
        Command::Refine {
            input,
            output,
            fine_to_coarse,
        } => {
            let refinement = mutwick::refine_file(&input, &output)?;
            info!(num_clones = refinement.num_clones, "Done");
            if let Some(path) = fine_to_coarse {
                write_json(&path, &refinement.fine_to_coarse)?;
            }
        }
        Command::Lineages { input } => {
            let tree = usher::load_file(input)?;
            let lineages: BTreeMap<String, Vec<String>> = usher::lineage_mutations(&tree)
                .into_iter()
                .map(|(label, mutations)| (label, mutations.iter().map(ToString::to_string).collect()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&lineages)?);
        }
        Command::Apply {
            input,
            reference,
            lineage,
        } => {
            let tree = usher::load_file(input)?;
            let reference: String = fs::read_to_string(reference)?
                .split_whitespace()
                .collect();
            let lineages = usher::lineage_mutations(&tree);
            let Some(mutations) = lineages.get(&lineage) else {
                error!(lineage = %lineage, "Unknown lineage");
                return Ok(ExitCode::FAILURE);
            };
            let result = overlay(&reference, mutations)?;
            info!(num_mismatches = result.mismatches.len(), "Applied {} mutations", mutations.len());
            println!("{}", result.sequence);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Error> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    info!(path = %path.display(), "Wrote JSON");
    Ok(())
}
