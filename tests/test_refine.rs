mod common;

use common::{annotated, example_tree, labels, mutation, named};
use mutwick::error::TreeError;
use mutwick::model::MutationTree;
use mutwick::refine::{ROOT_ADDRESS, refine};
use proptest::prelude::*;

#[test]
fn test_example_addresses() {
    let mut tree = example_tree();
    let (root, a, b, c, d) = (
        named(&tree, "root"),
        named(&tree, "A"),
        named(&tree, "B"),
        named(&tree, "C"),
        named(&tree, "D"),
    );

    let refinement = refine(&mut tree).unwrap();

    assert_eq!(tree[root].label(), Some(ROOT_ADDRESS));
    assert_eq!(tree[a].label(), Some("fine.0"));
    assert_eq!(tree[b].label(), None);
    assert_eq!(tree[c].label(), Some("fine.0.0"));
    assert_eq!(tree[d].label(), Some("fine.1"));
    assert_eq!(refinement.num_clones, 1);

    // The representative's label wins over the clone's
    assert_eq!(refinement.fine_to_coarse["fine"], "root");
    assert_eq!(refinement.fine_to_coarse["fine.0"], "A");
    assert_eq!(refinement.fine_to_coarse["fine.0.0"], "C");
    assert_eq!(refinement.fine_to_coarse["fine.1"], "D");
    assert_eq!(refinement.fine_to_coarse.len(), 4);
}

#[test]
fn test_refine_changes_labels_only() {
    let mut tree = example_tree();
    let before = tree.clone();
    refine(&mut tree).unwrap();

    assert_eq!(tree.to_newick(), before.to_newick());
    for index in tree.enumerate_nodes() {
        assert_eq!(tree[index].mutations(), before[index].mutations());
    }
}

#[test]
fn test_clone_label_used_for_unlabelled_representative() {
    let mut tree = annotated("((B)A)root;", &[("B", &[])]);
    let a = named(&tree, "A");
    tree[a].set_mutations(vec![mutation("C1T")]);

    let refinement = refine(&mut tree).unwrap();

    assert_eq!(tree[a].label(), Some("fine.0"));
    assert_eq!(refinement.fine_to_coarse["fine.0"], "B");
    assert!(!refinement.fine_to_coarse.contains_key("fine"));
}

#[test]
fn test_last_labelled_clone_wins() {
    let mut tree = annotated("((B,C)A)root;", &[("B", &[]), ("C", &[])]);
    let a = named(&tree, "A");
    tree[a].set_mutations(vec![mutation("C1T")]);

    let refinement = refine(&mut tree).unwrap();

    assert_eq!(refinement.fine_to_coarse["fine.0"], "C");
    assert_eq!(refinement.num_clones, 2);
}

#[test]
fn test_representative_label_beats_later_clones() {
    let mut tree = annotated("((B,C)A)root;", &[("A", &["C1T"]), ("B", &[]), ("C", &[])]);

    let refinement = refine(&mut tree).unwrap();

    assert_eq!(refinement.fine_to_coarse["fine.0"], "A");
}

#[test]
fn test_unlabelled_addresses_inherit_coarse_label() {
    let mut tree = annotated("(((C)B)A)root;", &[("root", &[]), ("A", &["C1T"])]);
    let b = named(&tree, "B");
    let c = named(&tree, "C");
    tree[b].set_mutations(vec![mutation("C2T")]);
    tree[c].set_mutations(vec![mutation("C3T")]);

    let refinement = refine(&mut tree).unwrap();

    assert_eq!(tree[c].label(), Some("fine.0.0.0"));
    assert_eq!(refinement.fine_to_coarse["fine"], "root");
    assert_eq!(refinement.fine_to_coarse["fine.0"], "A");
    assert_eq!(refinement.fine_to_coarse["fine.0.0"], "A");
    assert_eq!(refinement.fine_to_coarse["fine.0.0.0"], "A");
}

#[test]
fn test_no_inheritance_from_unlabelled_root() {
    let mut tree = annotated("((C)A)root;", &[("A", &["C1T"]), ("C", &["C2T"])]);
    let c = named(&tree, "C");
    tree[c].set_label(None);

    let refinement = refine(&mut tree).unwrap();

    assert_eq!(refinement.fine_to_coarse.len(), 2);
    assert_eq!(refinement.fine_to_coarse["fine.0"], "A");
    assert_eq!(refinement.fine_to_coarse["fine.0.0"], "A");
}

#[test]
fn test_single_node_tree() {
    let mut tree = MutationTree::new();
    tree.add_root().unwrap();
    let refinement = refine(&mut tree).unwrap();
    assert_eq!(labels(&tree), vec![Some("fine".to_string())]);
    assert_eq!(refinement.num_clones, 0);
}

#[test]
fn test_empty_tree_is_error() {
    let mut tree = MutationTree::new();
    assert_eq!(refine(&mut tree), Err(TreeError::NoRoot));
}

#[test]
fn test_refine_after_prune() {
    let mut tree = example_tree();
    mutwick::prune::prune(&mut tree, 4, None).unwrap();

    let refinement = refine(&mut tree).unwrap();

    // Without B there is no clone left
    assert_eq!(refinement.num_clones, 0);
    assert_eq!(
        labels(&tree),
        vec![
            Some("fine".to_string()),
            Some("fine.0".to_string()),
            Some("fine.0.0".to_string()),
            Some("fine.1".to_string()),
        ]
    );
}

// --- PROPERTIES ---
prop_compose! {
    fn arb_tree()(num_nodes in 1usize..40)(
        parents in proptest::collection::vec(any::<prop::sample::Index>(), num_nodes - 1),
        mutated in proptest::collection::vec(any::<bool>(), num_nodes),
        labelled in proptest::collection::vec(any::<bool>(), num_nodes),
    ) -> MutationTree {
        let mut tree = MutationTree::new();
        let root = tree.add_root().unwrap();
        let mut indices = vec![root];
        for parent in parents {
            let parent = indices[parent.index(indices.len())];
            indices.push(tree.add_child(parent).unwrap());
        }
        for (i, &index) in indices.iter().enumerate() {
            if mutated[i] {
                tree[index].set_mutations(vec![mutation(&format!("G{}A", i + 1))]);
            }
            if labelled[i] {
                tree[index].set_label(Some(format!("L{i}")));
            }
        }
        tree
    }
}

proptest! {
    #[test]
    fn prop_refinement_is_idempotent(tree in arb_tree()) {
        let mut once = tree.clone();
        let first = refine(&mut once).unwrap();
        let mut twice = once.clone();
        let second = refine(&mut twice).unwrap();

        prop_assert_eq!(labels(&once), labels(&twice));
        prop_assert_eq!(first.num_clones, second.num_clones);
        for (fine, coarse) in &second.fine_to_coarse {
            prop_assert_eq!(fine, coarse);
        }
    }

    #[test]
    fn prop_addresses_are_unique(tree in arb_tree()) {
        let mut refined = tree.clone();
        let refinement = refine(&mut refined).unwrap();

        let addresses: Vec<String> = labels(&refined).into_iter().flatten().collect();
        let unique: std::collections::BTreeSet<_> = addresses.iter().collect();
        prop_assert_eq!(unique.len(), addresses.len());
        prop_assert_eq!(refined.num_nodes() - addresses.len(), refinement.num_clones);
    }
}
