//! Data model for mutation-annotated phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [MutationTree], which uses the arena pattern to
//! store [Node]s referenced by [NodeIndex]. Nodes may have any number of
//! children. Each node carries the [Mutation]s of its incoming edge, an
//! optional lineage label, and its Newick name and branch length.
//!
//! Structural edits (see [MutationTree::remove_node]) only rewrite index
//! lists; removed nodes stay in the arena as detached nodes so that indices
//! handed out earlier stay valid.
//!
//! # Mutations
//! [Mutation] records are `(position, reference, mutant)` with the mutant being
//! a [NucleotideCode] (nucleotide or IUPAC ambiguity code).
//! [overlay](mutation::overlay) applies mutations to a reference sequence.

pub mod mutation;
pub mod node;
pub mod tree;

pub use mutation::{Mutation, Nucleotide, NucleotideCode, Overlay, ReferenceMismatch, overlay};
pub use node::{CondensedNode, Node};
pub use tree::{MutationTree, NodeIndex, PreOrderIter};
