//! Node (vertex) of a mutation-annotated phylogenetic tree.

use crate::model::mutation::Mutation;
use crate::model::tree::NodeIndex;

// =#========================================================================#=
// NODE
// =#========================================================================#=
/// A node of a [MutationTree](crate::model::MutationTree).
///
/// Nodes live in the tree's arena and refer to each other by [NodeIndex].
/// The mutations of a node are those on the edge from its parent to it.
///
/// # Invariants
/// - `index` is the position of the node in the arena
/// - the root has no parent; so has a detached (removed) node
/// - `children` order is the order used for traversal and serialization
/// - `branch_length` is non-negative if present
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Index of this node in the tree arena
    index: NodeIndex,
    /// Index of the parent node, `None` for root or detached nodes
    parent: Option<NodeIndex>,
    /// Indices of the child nodes, in order
    children: Vec<NodeIndex>,
    /// Mutations on the incoming edge, later ones override earlier ones
    mutations: Vec<Mutation>,
    /// Lineage (clade) label
    label: Option<String>,
    /// Newick name, e.g. sample name of a leaf
    name: Option<String>,
    /// Length of incoming edge
    branch_length: Option<f64>,
    /// Whether this node got removed from the tree
    detached: bool,
}

impl Node {
    pub(crate) fn new(index: NodeIndex, parent: Option<NodeIndex>) -> Self {
        Node {
            index,
            parent,
            children: Vec::new(),
            mutations: Vec::new(),
            label: None,
            name: None,
            branch_length: None,
            detached: false,
        }
    }

    /// Returns the index of this node.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the index of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Returns the indices of the children in order.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Returns whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns whether this node has been removed from its tree.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Returns the mutations on the edge to this node.
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Returns the mutations on the edge to this node for editing.
    pub fn mutations_mut(&mut self) -> &mut Vec<Mutation> {
        &mut self.mutations
    }

    /// Replaces the mutations on the edge to this node.
    pub fn set_mutations(&mut self, mutations: Vec<Mutation>) {
        self.mutations = mutations;
    }

    /// Number of mutations on the edge to this node.
    pub fn num_mutations(&self) -> usize {
        self.mutations.len()
    }

    /// Returns the lineage label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    /// Returns the Newick name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Returns the length of the incoming edge, if known.
    pub fn branch_length(&self) -> Option<f64> {
        self.branch_length
    }

    pub fn set_branch_length(&mut self, branch_length: Option<f64>) {
        self.branch_length = branch_length;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeIndex>) {
        self.parent = parent;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeIndex> {
        &mut self.children
    }

    pub(crate) fn detach(&mut self) {
        self.parent = None;
        self.detached = true;
    }
}

// =#========================================================================#=
// CONDENSED NODE
// =#========================================================================#=
/// Placeholder leaf standing for several identical samples,
/// carried through load and save unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CondensedNode {
    pub node_name: String,
    pub condensed_leaves: Vec<String>,
}
