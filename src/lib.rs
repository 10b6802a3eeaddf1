//! Mutwick is a library to condense and relabel mutation-annotated
//! phylogenetic trees, as used for viral lineage nomenclature.
//!
//! Trees are read from and written to the UShER protobuf format: a Newick
//! topology plus, per node, the mutations on its incoming edge and an
//! optional lineage label (clade).
//! Core functionality provided:
//! - Loading/saving: see [crate::usher], with [lineage_mutations](usher::lineage_mutations)
//!   to get the mutations that define each lineage.
//! - Pruning: condense a tree to a node budget while losing as little
//!   (weighted) mutation information as possible, see [crate::prune].
//! - Refinement: replace lineage labels by hierarchical fine addresses
//!   (`fine.0.2...`) and collapse clones, see [crate::refine].
//! - Sequences: apply a lineage's mutations to a reference sequence, see
//!   [overlay](model::overlay).
//! - Tree model: [MutationTree](model::MutationTree) uses the arena pattern,
//!   so no direct node references are stored, only node indices.
//!   See [crate::model] for more details.
//!
//! Limitations:
//! - Single chromosome; the `chromosome` field of mutations is not kept
//! - Pango alias compression of lineage names is not done
//!
//! # Usage patterns
//! 1. Quick access: [load_file], [prune_file] and [refine_file] read and
//!    write files with default settings.
//! 2. Full control: load with [usher::load], configure a
//!    [Pruner](prune::Pruner), call [refine](refine::refine) and save with
//!    [usher::save].
//!
//! ## Example
//! ```
//! use mutwick::newick::parse_str;
//! use mutwick::prune::Pruner;
//! use mutwick::refine::refine;
//!
//! let mut tree = parse_str("((C,D)B,E)A;")?;
//! tree[1].set_mutations(vec!["C241T".parse()?]);
//! tree[1].set_label(Some("B.1".to_string()));
//!
//! let report = Pruner::new(4).prune(&mut tree)?;
//! assert_eq!(report.num_pruned, 1);
//!
//! let refinement = refine(&mut tree)?;
//! assert_eq!(refinement.fine_to_coarse["fine.0"], "B.1");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod clades;
pub mod error;
pub mod model;
pub mod newick;
pub mod parser;
pub mod prune;
pub mod refine;
pub mod usher;

pub use error::Error;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::model::MutationTree;
use crate::prune::{PruneReport, Pruner};
use crate::refine::Refinement;

// ============================================================================
// Quick API
// ============================================================================
/// Loads a mutation-annotated tree from a protobuf file.
///
/// See [`usher::load_file`] for full documentation.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<MutationTree, Error> {
    usher::load_file(path)
}

/// Prunes the tree in `input` down to `max_num_nodes` nodes and writes it to
/// `output`, optionally weighting nodes by lineage label.
///
/// If no pruning is needed, `input` is copied to `output` unchanged.
pub fn prune_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    max_num_nodes: usize,
    weights: Option<HashMap<String, f64>>,
) -> Result<PruneReport, Error> {
    let mut tree = usher::load_file(input.as_ref())?;
    if tree.num_nodes() <= max_num_nodes {
        info!(num_nodes = tree.num_nodes(), "No pruning needed, copying input");
        fs::copy(input.as_ref(), output.as_ref())?;
        return Ok(PruneReport::default());
    }

    let mut pruner = Pruner::new(max_num_nodes);
    if let Some(weights) = weights {
        pruner = pruner.with_weights(weights);
    }
    let report = pruner.prune(&mut tree)?;
    usher::save_file(&tree, output)?;
    Ok(report)
}

/// Refines the lineage labels of the tree in `input` and writes it to `output`.
pub fn refine_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<Refinement, Error> {
    let mut tree = usher::load_file(input)?;
    let refinement = refine::refine(&mut tree)?;
    usher::save_file(&tree, output)?;
    Ok(refinement)
}
