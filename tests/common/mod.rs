#![allow(dead_code)]

use mutwick::model::{Mutation, MutationTree, NodeIndex};
use mutwick::newick::parse_str;

pub fn mutation(notation: &str) -> Mutation {
    notation.parse().unwrap()
}

pub fn mutations(notations: &[&str]) -> Vec<Mutation> {
    notations.iter().map(|m| mutation(m)).collect()
}

/// Index of the node with Newick name `name`.
pub fn named(tree: &MutationTree, name: &str) -> NodeIndex {
    tree.pre_order_iter()
        .find(|n| n.name() == Some(name))
        .map(|n| n.index())
        .unwrap_or_else(|| panic!("no node named {name}"))
}

/// Parses `newick`, then gives each listed node its name as label and the
/// given mutations.
pub fn annotated(newick: &str, annotations: &[(&str, &[&str])]) -> MutationTree {
    let mut tree = parse_str(newick).unwrap();
    for &(name, notations) in annotations {
        let index = named(&tree, name);
        tree[index].set_label(Some(name.to_string()));
        tree[index].set_mutations(mutations(notations));
    }
    tree
}

/// `root -> A -> {B, C}` and `root -> D` with 2 mutations into A, none into
/// B, one into C and one into D.
pub fn example_tree() -> MutationTree {
    annotated(
        "((B,C)A,D)root;",
        &[
            ("root", &[]),
            ("A", &["C241T", "A1000G"]),
            ("B", &[]),
            ("C", &["G2000T"]),
            ("D", &["T3000C"]),
        ],
    )
}

/// Labels of the live nodes in pre-order.
pub fn labels(tree: &MutationTree) -> Vec<Option<String>> {
    tree.pre_order_iter()
        .map(|n| n.label().map(str::to_string))
        .collect()
}
