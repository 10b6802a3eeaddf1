//! Loading and saving mutation-annotated trees in the UShER protobuf format.
//!
//! A serialized tree is a single [Data](proto::Data) message holding
//! * the topology as Newick string,
//! * per-node mutation lists and per-node lineage metadata, both aligned
//!   with the pre-order of the Newick topology,
//! * condensed sample groups, carried through unchanged.
//!
//! [load] checks this alignment before building a [MutationTree], so the
//! engines never see misaligned annotations. [save] writes the live part of a
//! (possibly pruned or refined) tree back in the same format.

pub mod proto;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use prost::Message;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::{Error, MutationError};
use crate::model::{CondensedNode, Mutation, MutationTree, Nucleotide, NucleotideCode};
use crate::newick;
use crate::parser::ParsingError;

// =#========================================================================#=
// WIRE ERROR
// =#========================================================================$=
/// Errors of malformed wire payloads.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("Invalid protobuf payload - {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Invalid topology - {0}")]
    Newick(#[from] ParsingError),

    #[error(
        "Annotations misaligned with topology: {num_nodes} nodes, \
         {num_metadata} metadata entries, {num_mutation_lists} mutation lists"
    )]
    MisalignedAnnotations {
        num_nodes: usize,
        num_metadata: usize,
        num_mutation_lists: usize,
    },

    #[error("Invalid mutation of node {node} - {source}")]
    InvalidMutation {
        node: usize,
        #[source]
        source: MutationError,
    },
}

// =#========================================================================#=
// LOAD / SAVE
// =#========================================================================$=
/// Decodes a mutation-annotated tree from protobuf bytes.
///
/// Empty `clade` metadata means "no label".
///
/// # Errors
/// * [WireError::Decode] if the bytes are not a `data` message
/// * [WireError::Newick] if the topology does not parse
/// * [WireError::MisalignedAnnotations] if metadata or mutation arrays do not
///   have one entry per node
/// * [WireError::InvalidMutation] for positions < 1 or nucleotide indices
///   outside `0..=3`
pub fn load(bytes: &[u8]) -> Result<MutationTree, WireError> {
    let data = proto::Data::decode(bytes)?;
    let mut tree = newick::parse_str(&data.newick)?;
    let order = tree.enumerate_nodes();

    if data.metadata.len() != order.len() || data.node_mutations.len() != order.len() {
        return Err(WireError::MisalignedAnnotations {
            num_nodes: order.len(),
            num_metadata: data.metadata.len(),
            num_mutation_lists: data.node_mutations.len(),
        });
    }

    for (position, ((&index, metadata), mutations)) in order
        .iter()
        .zip(data.metadata)
        .zip(data.node_mutations)
        .enumerate()
    {
        let mutations = mutations
            .mutation
            .iter()
            .map(decode_mutation)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| WireError::InvalidMutation {
                node: position,
                source,
            })?;

        let node = &mut tree[index];
        node.set_mutations(mutations);
        node.set_label((!metadata.clade.is_empty()).then_some(metadata.clade));
    }

    tree.set_condensed_nodes(
        data.condensed_nodes
            .into_iter()
            .map(|c| CondensedNode {
                node_name: c.node_name,
                condensed_leaves: c.condensed_leaves,
            })
            .collect(),
    );

    debug!(num_nodes = tree.num_nodes(), "Loaded mutation tree");
    Ok(tree)
}

/// Encodes the live part of a tree as protobuf bytes.
///
/// Metadata and mutation lists are written in the pre-order of the written
/// Newick string; nodes without label get an empty `clade`.
pub fn save(tree: &MutationTree) -> Vec<u8> {
    let order = tree.enumerate_nodes();
    let data = proto::Data {
        newick: newick::to_newick(tree),
        node_mutations: order
            .iter()
            .map(|&i| proto::MutationList {
                mutation: tree[i].mutations().iter().map(encode_mutation).collect(),
            })
            .collect(),
        condensed_nodes: tree
            .condensed_nodes()
            .iter()
            .map(|c| proto::CondensedNode {
                node_name: c.node_name.clone(),
                condensed_leaves: c.condensed_leaves.clone(),
            })
            .collect(),
        metadata: order
            .iter()
            .map(|&i| proto::NodeMetadata {
                clade: tree[i].label().unwrap_or_default().to_string(),
            })
            .collect(),
    };
    data.encode_to_vec()
}

/// Reads and decodes a mutation-annotated tree from a file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<MutationTree, Error> {
    let bytes = fs::read(path.as_ref())?;
    let tree = load(&bytes)?;
    info!(
        path = %path.as_ref().display(),
        num_nodes = tree.num_nodes(),
        "Loaded mutation tree"
    );
    Ok(tree)
}

/// Encodes and writes a mutation-annotated tree to a file.
pub fn save_file<P: AsRef<Path>>(tree: &MutationTree, path: P) -> Result<(), Error> {
    fs::write(path.as_ref(), save(tree))?;
    info!(
        path = %path.as_ref().display(),
        num_nodes = tree.num_nodes(),
        "Saved mutation tree"
    );
    Ok(())
}

fn decode_mutation(m: &proto::Mut) -> Result<Mutation, MutationError> {
    let position = u32::try_from(m.position)
        .map_err(|_| MutationError::InvalidPosition(i64::from(m.position)))?;
    let reference = Nucleotide::from_index(m.ref_nuc)?;
    let parent = Nucleotide::from_index(m.par_nuc)?;
    let mutant = NucleotideCode::from_indices(&m.mut_nuc)?;
    Ok(Mutation::new(position, reference, mutant)?.with_parent(parent))
}

fn encode_mutation(m: &Mutation) -> proto::Mut {
    proto::Mut {
        // Bounded by Mutation::MAX_POSITION
        position: m.position() as i32,
        ref_nuc: m.reference().index(),
        par_nuc: m.parent().index(),
        mut_nuc: m.mutant().nucleotides().map(Nucleotide::index).collect(),
        chromosome: String::new(),
    }
}

// =#========================================================================#=
// LINEAGE MUTATIONS
// =#========================================================================$=
/// Maps every lineage label of a tree to the set of mutations accumulated
/// on the path from the root to its node.
///
/// Along a path, a node's mutation replaces any ancestor mutation at the
/// same position. If a label occurs on several nodes, the last one in
/// pre-order wins.
///
/// The tree is walked once with a single position map that is updated on
/// the way down and restored on the way up.
pub fn lineage_mutations(tree: &MutationTree) -> BTreeMap<String, BTreeSet<Mutation>> {
    let mut lineages = BTreeMap::new();
    let Ok(root) = tree.root_index() else {
        return lineages;
    };

    let mut accumulated: BTreeMap<u32, Mutation> = BTreeMap::new();
    // Overwritten entries, restored when leaving the node
    let mut undo: Vec<Vec<(u32, Option<Mutation>)>> = Vec::new();
    // (index, entered)
    let mut stack = vec![(root, false)];

    while let Some((index, entered)) = stack.pop() {
        let node = &tree[index];
        if entered {
            for (position, previous) in undo.pop().into_iter().flatten().rev() {
                match previous {
                    Some(mutation) => accumulated.insert(position, mutation),
                    None => accumulated.remove(&position),
                };
            }
            continue;
        }

        let overwritten = node
            .mutations()
            .iter()
            .map(|m| (m.position(), accumulated.insert(m.position(), *m)))
            .collect();
        undo.push(overwritten);

        if let Some(label) = node.label() {
            lineages.insert(label.to_string(), accumulated.values().copied().collect());
        }

        stack.push((index, true));
        stack.extend(node.children().iter().rev().map(|&c| (c, false)));
    }

    lineages
}
