//! Error types shared across the crate.
//!
//! Each layer has its own error enum ([TreeError], [MutationError],
//! [ParsingError], [WireError], [PruneError]); [Error] is the umbrella
//! returned by the file-level convenience functions.

use crate::model::NodeIndex;
use crate::parser::ParsingError;
use crate::prune::PruneError;
use crate::usher::WireError;
use thiserror::Error;

// =#========================================================================#=
// TREE ERROR
// =#========================================================================$=
/// Violations of the structural invariants of a
/// [MutationTree](crate::model::MutationTree).
///
/// These are never recovered from: an engine that hits one aborts before
/// editing the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Tree has no root")]
    NoRoot,

    #[error("Tree already has a root (node {0})")]
    RootAlreadySet(NodeIndex),

    #[error("Attempted to remove the root (node {0})")]
    RootRemoval(NodeIndex),

    #[error("Node {0} does not exist")]
    UnknownNode(NodeIndex),

    #[error("Node {0} has been removed from the tree")]
    DetachedNode(NodeIndex),

    #[error("Node {0} is reachable through more than one parent")]
    DuplicateNode(NodeIndex),

    #[error("Node {0} is not listed as child of its parent")]
    MissingParent(NodeIndex),

    #[error("Node {0} is not reachable from the root")]
    OrphanedNode(NodeIndex),
}

// =#========================================================================#=
// MUTATION ERROR
// =#========================================================================$=
/// Invalid mutation records or mutation application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("Invalid mutation position {0} (positions are 1-based)")]
    InvalidPosition(i64),

    #[error("Position {position} is beyond reference of length {len}")]
    PositionOutOfRange { position: u32, len: usize },

    #[error("Invalid nucleotide index {0} (expected 0..=3)")]
    InvalidNucleotideIndex(i32),

    #[error("Invalid nucleotide {0:?}")]
    InvalidNucleotide(char),

    #[error("Mutation has no mutant nucleotide")]
    EmptyMutant,

    #[error("Invalid mutation notation {0:?} (expected e.g. C241T)")]
    InvalidNotation(String),

    #[error("Reference sequence must be ASCII")]
    NonAsciiReference,
}

// =#========================================================================#=
// ERROR (umbrella)
// =#========================================================================$=
/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Prune(#[from] PruneError),

    #[error("IO error - {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON - {0}")]
    Json(#[from] serde_json::Error),
}
