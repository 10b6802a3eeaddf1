//! Arena-based mutation-annotated tree.
//!
//! Provides [MutationTree], a rooted tree of arbitrary degree whose nodes
//! carry the mutations of their incoming edge and an optional lineage label,
//! together with pre- and post-order iterators and [NodeIndex] as the type
//! used to refer to nodes.

use std::collections::BTreeMap;

use crate::error::TreeError;
use crate::model::mutation::Mutation;
use crate::model::node::{CondensedNode, Node};
use crate::newick;

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted phylogenetic tree represented using the arena pattern on [Node].
///
/// Nodes are stored in a contiguous vector and referenced by [NodeIndex].
/// Parent and child relations are index lists, so structural edits such as
/// [remove_node](Self::remove_node) are list updates.
///
/// # Structure
/// - Removed nodes stay in the arena, marked as detached, so indices remain
///   stable for the lifetime of the tree.
/// - Only nodes reachable from the root are *live*; [num_nodes](Self::num_nodes)
///   counts those.
/// - Trees loaded from Newick have their nodes in pre-order, i.e. arena index
///   and traversal index coincide until the first edit.
///
/// # Construction
/// Add a root with [add_root](Self::add_root), then children one by one with
/// [add_child](Self::add_child). Test validity with [validate](Self::validate).
#[derive(Debug, Clone, Default)]
pub struct MutationTree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<Node>,

    /// Index of the root of this tree
    root_index: Option<NodeIndex>,

    /// Number of nodes not detached
    num_live: usize,

    /// Condensed sample groups, passed through untouched
    condensed_nodes: Vec<CondensedNode>,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl MutationTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tree with room for `num_nodes` nodes.
    pub fn with_capacity(num_nodes: usize) -> Self {
        MutationTree {
            nodes: Vec::with_capacity(num_nodes),
            ..Self::default()
        }
    }

    /// Adds the root to the tree and returns its index.
    ///
    /// # Errors
    /// [TreeError::RootAlreadySet] if the tree already has a root.
    pub fn add_root(&mut self) -> Result<NodeIndex, TreeError> {
        if let Some(root) = self.root_index {
            return Err(TreeError::RootAlreadySet(root));
        }

        let index = self.nodes.len();
        self.nodes.push(Node::new(index, None));
        self.root_index = Some(index);
        self.num_live += 1;
        Ok(index)
    }

    /// Adds a new node as last child of `parent` and returns its index.
    ///
    /// # Errors
    /// * [TreeError::UnknownNode] if `parent` is not in the arena
    /// * [TreeError::DetachedNode] if `parent` has been removed
    pub fn add_child(&mut self, parent: NodeIndex) -> Result<NodeIndex, TreeError> {
        self.check_live(parent)?;

        let index = self.nodes.len();
        self.nodes.push(Node::new(index, Some(parent)));
        self.nodes[parent].children_mut().push(index);
        self.num_live += 1;
        Ok(index)
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index.is_some()
    }

    /// Returns the index of the root.
    ///
    /// # Errors
    /// [TreeError::NoRoot] if the tree is empty.
    pub fn root_index(&self) -> Result<NodeIndex, TreeError> {
        self.root_index.ok_or(TreeError::NoRoot)
    }

    /// Returns the number of live (not removed) nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_live
    }

    /// Returns the number of live leaves.
    pub fn num_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| !n.is_detached() && n.is_leaf())
            .count()
    }

    /// Returns the size of the arena, including detached nodes.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the condensed sample groups of this tree.
    pub fn condensed_nodes(&self) -> &[CondensedNode] {
        &self.condensed_nodes
    }

    pub fn set_condensed_nodes(&mut self, condensed_nodes: Vec<CondensedNode>) {
        self.condensed_nodes = condensed_nodes;
    }

    /// Returns the node index of the first live node labelled `label`.
    pub fn find_label(&self, label: &str) -> Option<NodeIndex> {
        self.pre_order_iter()
            .find(|n| n.label() == Some(label))
            .map(Node::index)
    }

    /// Convenience method to convert this tree to a Newick string.
    pub fn to_newick(&self) -> String {
        newick::to_newick(self)
    }
}

// ============================================================================
// Structure: enumeration, removal, validation (pub)
// ============================================================================
impl MutationTree {
    /// Returns the indices of all live nodes in pre-order.
    ///
    /// The order is deterministic (children in child-list order), so the
    /// position of a node in this list can serve as a stable index.
    pub fn enumerate_nodes(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.num_live);
        order.extend(self.pre_order_iter().map(Node::index));
        order
    }

    /// Removes `index` from the tree and returns the index of its former parent.
    ///
    /// The children of the removed node take its place in the parent's child
    /// list, keeping their relative order. The removed node stays in the arena
    /// (detached, with no parent and no children), but keeps its mutations and
    /// label. Mutations are *not* merged here, see [crate::prune].
    ///
    /// # Errors
    /// * [TreeError::RootRemoval] if `index` is the root
    /// * [TreeError::UnknownNode] / [TreeError::DetachedNode] if `index` is not live
    /// * [TreeError::MissingParent] if parent and child links disagree
    pub fn remove_node(&mut self, index: NodeIndex) -> Result<NodeIndex, TreeError> {
        self.check_live(index)?;
        if self.root_index == Some(index) {
            return Err(TreeError::RootRemoval(index));
        }

        // Check everything before touching anything
        let parent = self.nodes[index]
            .parent()
            .ok_or(TreeError::MissingParent(index))?;
        let position = self.nodes[parent]
            .children()
            .iter()
            .position(|&c| c == index)
            .ok_or(TreeError::MissingParent(index))?;

        let children = std::mem::take(self.nodes[index].children_mut());
        for &child in &children {
            self.nodes[child].set_parent(Some(parent));
        }
        self.nodes[parent]
            .children_mut()
            .splice(position..=position, children);
        self.nodes[index].detach();
        self.num_live -= 1;

        Ok(parent)
    }

    /// Returns the mutations accumulated on the path from the root to `index`,
    /// keyed by position; a mutation further down overrides one further up.
    pub fn path_mutations(&self, index: NodeIndex) -> Result<BTreeMap<u32, Mutation>, TreeError> {
        self.check_live(index)?;

        let mut path = vec![index];
        let mut current = index;
        while let Some(parent) = self.nodes[current].parent() {
            path.push(parent);
            current = parent;
        }

        let mut accumulated = BTreeMap::new();
        for &node in path.iter().rev() {
            for mutation in self.nodes[node].mutations() {
                accumulated.insert(mutation.position(), *mutation);
            }
        }
        Ok(accumulated)
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root is set, live and has no parent
    /// - All child indices are valid and point back to correct parent
    /// - No node is reached twice from the root
    /// - Every live node is reachable from the root
    ///
    /// # Returns
    /// The first violated invariant as [TreeError], `Ok(())` otherwise.
    pub fn validate(&self) -> Result<(), TreeError> {
        let root = self.root_index()?;
        self.check_live(root)?;
        if self.nodes[root].parent().is_some() {
            return Err(TreeError::MissingParent(root));
        }

        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![root];
        seen[root] = true;
        let mut num_reached = 1;
        while let Some(index) = stack.pop() {
            for &child in self.nodes[index].children() {
                self.check_live(child)?;
                if seen[child] {
                    return Err(TreeError::DuplicateNode(child));
                }
                if self.nodes[child].parent() != Some(index) {
                    return Err(TreeError::MissingParent(child));
                }
                seen[child] = true;
                num_reached += 1;
                stack.push(child);
            }
        }

        if num_reached != self.num_live {
            let orphan = self
                .nodes
                .iter()
                .find(|n| !n.is_detached() && !seen[n.index()])
                .map_or(root, Node::index);
            return Err(TreeError::OrphanedNode(orphan));
        }

        Ok(())
    }

    /// Checks that `index` is in the arena and not detached.
    fn check_live(&self, index: NodeIndex) -> Result<(), TreeError> {
        match self.nodes.get(index) {
            None => Err(TreeError::UnknownNode(index)),
            Some(node) if node.is_detached() => Err(TreeError::DetachedNode(index)),
            Some(_) => Ok(()),
        }
    }
}

impl std::ops::Index<NodeIndex> for MutationTree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

impl std::ops::IndexMut<NodeIndex> for MutationTree {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index]
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl MutationTree {
    /// Returns an iterator over the live nodes in pre-order
    /// (parents before children, children in child-list order).
    ///
    /// # Example
    /// ```
    /// use mutwick::model::MutationTree;
    ///
    /// let mut tree = MutationTree::new();
    /// let root = tree.add_root().unwrap();
    /// let a = tree.add_child(root).unwrap();
    /// let b = tree.add_child(root).unwrap();
    /// let c = tree.add_child(a).unwrap();
    ///
    /// let indices: Vec<_> = tree.pre_order_iter().map(|n| n.index()).collect();
    /// assert_eq!(indices, vec![root, a, c, b]);
    /// ```
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PreOrderIter<'a> {
    tree: &'a MutationTree,
    stack: Vec<NodeIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a MutationTree) -> Self {
        PreOrderIter {
            tree,
            stack: tree.root_index.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree[index];
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

// =#========================================================================#=
// TESTS
// =#========================================================================$=
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_node_detaches_and_keeps_index() {
        let mut tree = MutationTree::new();
        let root = tree.add_root().unwrap();
        let a = tree.add_child(root).unwrap();

        assert_eq!(tree.remove_node(a), Ok(root));
        assert!(tree[a].is_detached());
        assert_eq!(tree.arena_len(), 2);
        assert_eq!(tree.num_nodes(), 1);
        assert_eq!(tree.remove_node(a), Err(TreeError::DetachedNode(a)));
    }

    #[test]
    fn test_validate_detects_duplicate_child() {
        let mut tree = MutationTree::new();
        let root = tree.add_root().unwrap();
        let a = tree.add_child(root).unwrap();
        tree[root].children_mut().push(a);

        assert_eq!(tree.validate(), Err(TreeError::DuplicateNode(a)));
    }

    #[test]
    fn test_validate_detects_orphan() {
        let mut tree = MutationTree::new();
        let root = tree.add_root().unwrap();
        let a = tree.add_child(root).unwrap();
        tree[root].children_mut().clear();

        assert_eq!(tree.validate(), Err(TreeError::OrphanedNode(a)));
    }
}
