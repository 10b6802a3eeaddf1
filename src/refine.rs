//! Refinement of lineage labels into hierarchical fine addresses.
//!
//! Every node gets an address derived from its position in the tree: the
//! root is [ROOT_ADDRESS], a child reached over an edge with mutations gets
//! a fresh address `"{parent}.{n}"`, and a child reached over an edge
//! without mutations is a *clone* of its parent and shares its address.
//! The counter `n` runs per parent address, so children of a node and of
//! its clones are numbered together.
//!
//! The original (coarse) lineage labels are kept in
//! [Refinement::fine_to_coarse]; addresses without a labelled node inherit
//! the coarse label of their parent address.
//!
//! # Example
//! ```
//! use mutwick::refine::refine;
//! use mutwick::model::MutationTree;
//!
//! let mut tree = MutationTree::new();
//! let root = tree.add_root().unwrap();
//! let a = tree.add_child(root).unwrap();
//! tree[a].set_mutations(vec!["C241T".parse().unwrap()]);
//! tree[a].set_label(Some("B.1".to_string()));
//! let clone = tree.add_child(a).unwrap();
//!
//! let refinement = refine(&mut tree).unwrap();
//! assert_eq!(tree[a].label(), Some("fine.0"));
//! assert_eq!(tree[clone].label(), None);
//! assert_eq!(refinement.fine_to_coarse["fine.0"], "B.1");
//! assert_eq!(refinement.num_clones, 1);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::TreeError;
use crate::model::{MutationTree, NodeIndex};

/// Address of the root node.
pub const ROOT_ADDRESS: &str = "fine";

/// Outcome of refinement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Refinement {
    /// Coarse lineage label of each fine address that has one
    pub fine_to_coarse: BTreeMap<String, String>,
    /// Number of nodes that share their parent's address
    pub num_clones: usize,
}

/// One fine address and the node it was minted for.
#[derive(Debug)]
struct Address {
    fine: String,
    representative: NodeIndex,
    parent: Option<usize>,
    num_children: usize,
    coarse: Option<String>,
}

/// Relabels `tree` in place with fine addresses.
///
/// Only labels change: the node a fine address was minted for carries it as
/// label, clones lose their label. Refining an already refined tree yields
/// the same labels again.
///
/// # Errors
/// [TreeError::NoRoot] if the tree is empty.
pub fn refine(tree: &mut MutationTree) -> Result<Refinement, TreeError> {
    let root = tree.root_index()?;
    let order = tree.enumerate_nodes();
    info!("Refining a tree with {} nodes", order.len());

    let mut addresses = vec![Address {
        fine: ROOT_ADDRESS.to_string(),
        representative: root,
        parent: None,
        num_children: 0,
        coarse: None,
    }];
    // Arena index -> address id
    let mut address_of = vec![0; tree.arena_len()];

    // Pre-order, so parent addresses always exist and get lower ids
    for &index in order.iter().skip(1) {
        let node = &tree[index];
        let parent = node.parent().ok_or(TreeError::MissingParent(index))?;
        let parent_address = address_of[parent];

        address_of[index] = if node.num_mutations() == 0 {
            parent_address
        } else {
            let n = addresses[parent_address].num_children;
            addresses[parent_address].num_children += 1;
            addresses.push(Address {
                fine: format!("{}.{}", addresses[parent_address].fine, n),
                representative: index,
                parent: Some(parent_address),
                num_children: 0,
                coarse: None,
            });
            addresses.len() - 1
        };
    }

    let num_clones = order.len() - addresses.len();
    info!("Found {} clones", num_clones);

    for &index in &order {
        let Some(label) = tree[index].label() else {
            continue;
        };
        // The representative's label wins, otherwise the last labelled clone
        let address = &mut addresses[address_of[index]];
        if address.representative == index || tree[address.representative].label().is_none() {
            address.coarse = Some(label.to_string());
        }
    }

    for id in 1..addresses.len() {
        if addresses[id].coarse.is_some() {
            continue;
        }
        if let Some(parent) = addresses[id].parent {
            addresses[id].coarse = addresses[parent].coarse.clone();
        }
    }

    for &index in &order {
        let address = &addresses[address_of[index]];
        let label = (address.representative == index).then(|| address.fine.clone());
        tree[index].set_label(label);
    }

    let mut fine_to_coarse = BTreeMap::new();
    for address in addresses {
        if let Some(coarse) = address.coarse {
            info!("Refined {} -> {}", coarse, address.fine);
            fine_to_coarse.insert(address.fine, coarse);
        } else {
            debug!(fine = %address.fine, "No coarse lineage");
        }
    }

    Ok(Refinement {
        fine_to_coarse,
        num_clones,
    })
}
