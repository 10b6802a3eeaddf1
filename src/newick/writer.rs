//! Newick string writing for [MutationTree].

use crate::model::{MutationTree, Node, NodeIndex};
use crate::newick::defs::CHARS_PER_NODE_GUESS;
use crate::parser::utils::escape_label;

/// Returns the Newick representation of the live part of a tree,
/// with closing semicolon.
///
/// Node names are escaped if necessary and branch lengths are written where
/// known. Children appear in child-list order, so parsing the result again
/// yields the nodes in the same pre-order as [MutationTree::enumerate_nodes].
/// An empty tree is written as `;`.
///
/// # Example
/// ```
/// use mutwick::newick::{parse_str, to_newick};
///
/// let tree = parse_str("((A:1,'B c':2)x,C)root;").unwrap();
/// assert_eq!(to_newick(&tree), "((A:1,'B c':2)x,C)root;");
/// ```
pub fn to_newick(tree: &MutationTree) -> String {
    let mut newick = String::with_capacity(estimate_newick_len(tree));

    // (index, next child to write)
    let mut stack: Vec<(NodeIndex, usize)> = tree.root_index().ok().map(|r| (r, 0)).into_iter().collect();
    while let Some((index, next_child)) = stack.pop() {
        let node = &tree[index];
        let children = node.children();

        if next_child < children.len() {
            newick.push(if next_child == 0 { '(' } else { ',' });
            stack.push((index, next_child + 1));
            stack.push((children[next_child], 0));
        } else {
            if !children.is_empty() {
                newick.push(')');
            }
            push_name_and_length(&mut newick, node);
        }
    }

    newick.push(';');
    newick
}

/// Appends `name[:branch_length]` of a node.
fn push_name_and_length(newick: &mut String, node: &Node) {
    if let Some(name) = node.name() {
        newick.push_str(&escape_label(name));
    }
    if let Some(branch_length) = node.branch_length() {
        newick.push(':');
        newick.push_str(&branch_length.to_string());
    }
}

/// Estimates the length of the Newick string of a tree, to pre-allocate
/// string capacity.
pub(crate) fn estimate_newick_len(tree: &MutationTree) -> usize {
    tree.num_nodes() * CHARS_PER_NODE_GUESS + 1
}
