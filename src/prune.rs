//! Greedy weighted pruning of mutation trees.
//!
//! Condenses a tree to a node budget by repeatedly removing the non-root node
//! of least value under the error-minimizing objective
//!
//! ```text
//! loss(node) = weight(node) * num_mutations(node)
//! ```
//!
//! A removed node's mutations are prepended to each of its children (so a
//! child's own mutations still override them), and its weight is added to
//! its parent. Only the immediate parent absorbs the weight; it reaches
//! further ancestors only if the parent itself gets removed later.
//!
//! # Priority queue
//! Losses change as nodes are removed: the parent gains weight, the children
//! gain mutations. Instead of rebuilding the heap after every removal, each
//! popped entry is re-evaluated and pushed back if its loss is stale. An
//! entry whose stored loss equals its current loss is the true minimum,
//! since losses only ever grow.
//!
//! # Example
//! ```
//! use mutwick::newick::parse_str;
//! use mutwick::prune::Pruner;
//!
//! // No mutations anywhere, so every loss is 0 and pre-order breaks the tie
//! let mut tree = parse_str("((B,C)A)root;").unwrap();
//! let report = Pruner::new(3).prune(&mut tree).unwrap();
//! assert_eq!(report.num_pruned, 1);
//! assert_eq!(tree.to_newick(), "(B,C)root;");
//! ```

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::TreeError;
use crate::model::{MutationTree, NodeIndex};

// =#========================================================================#=
// PRUNE ERROR
// =#========================================================================$=
/// Errors that abort pruning. All are raised before the tree is edited.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PruneError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Cannot prune to {0} nodes, the root always remains")]
    InvalidTarget(usize),

    #[error("Invalid weight {weight} for lineage {label:?} (must be finite and non-negative)")]
    InvalidWeight { label: String, weight: f64 },

    #[error("Ran out of prunable nodes")]
    Exhausted,
}

// =#========================================================================#=
// PRUNE REPORT
// =#========================================================================$=
/// Outcome of pruning.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PruneReport {
    /// Label of each removed labelled node, mapped to the label of the
    /// surviving ancestor it got merged into (`None` if that is unlabelled)
    pub renames: BTreeMap<String, Option<String>>,
    /// Number of removed nodes
    pub num_pruned: usize,
}

// =#========================================================================#=
// PRUNER
// =#========================================================================$=
/// Pruning configuration.
///
/// # Construction
/// * [`new(max_num_nodes)`](Self::new) — every node has weight 1
/// * [`with_weights(weights)`](Self::with_weights) — a node's weight is the
///   weight of its label, 0 if unlabelled or not in `weights`
///
/// # Pruning
/// * [`prune(tree)`](Self::prune) — prunes the tree in place
#[derive(Debug, Clone)]
pub struct Pruner {
    max_num_nodes: usize,
    weights: Option<HashMap<String, f64>>,
}

impl Pruner {
    /// Creates a new [Pruner] condensing trees to `max_num_nodes` nodes.
    pub fn new(max_num_nodes: usize) -> Self {
        Self {
            max_num_nodes,
            weights: None,
        }
    }

    /// Weights nodes by their lineage label.
    pub fn with_weights(mut self, weights: HashMap<String, f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Returns the node budget.
    pub fn max_num_nodes(&self) -> usize {
        self.max_num_nodes
    }

    /// Prunes `tree` in place down to exactly `max_num_nodes` nodes.
    ///
    /// If the tree already has at most `max_num_nodes` nodes, it is left
    /// unchanged and an empty report is returned.
    ///
    /// # Errors
    /// * [PruneError::InvalidTarget] if `max_num_nodes` is 0
    /// * [PruneError::InvalidWeight] for negative or non-finite weights
    /// * [PruneError::Tree] if the tree violates a structural invariant
    pub fn prune(&self, tree: &mut MutationTree) -> Result<PruneReport, PruneError> {
        if self.max_num_nodes == 0 {
            return Err(PruneError::InvalidTarget(0));
        }
        if let Some(weights) = &self.weights {
            if let Some((label, &weight)) = weights
                .iter()
                .find(|&(_, &w)| !w.is_finite() || w < 0.0)
            {
                return Err(PruneError::InvalidWeight {
                    label: label.clone(),
                    weight,
                });
            }
        }

        let num_nodes = tree.num_nodes();
        if self.max_num_nodes >= num_nodes {
            info!(num_nodes, max_num_nodes = self.max_num_nodes, "Nothing to prune");
            return Ok(PruneReport::default());
        }
        tree.validate()?;

        let num_pruned = num_nodes - self.max_num_nodes;
        info!("Pruning {}/{} nodes", num_pruned, num_nodes);

        let mut weights = self.initial_weights(tree);
        let report = condense(tree, &mut weights, num_pruned)?;
        debug_assert_eq!(tree.num_nodes(), self.max_num_nodes);

        info!(
            num_nodes = tree.num_nodes(),
            num_renamed = report.renames.len(),
            "Pruned tree"
        );
        Ok(report)
    }

    /// Weights indexed by arena index.
    fn initial_weights(&self, tree: &MutationTree) -> Vec<f64> {
        let mut weights = vec![0.0; tree.arena_len()];
        for node in tree.pre_order_iter() {
            weights[node.index()] = match &self.weights {
                None => 1.0,
                Some(map) => node
                    .label()
                    .and_then(|label| map.get(label))
                    .copied()
                    .unwrap_or(0.0),
            };
        }
        weights
    }
}

/// Prunes `tree` in place down to `max_num_nodes` nodes, optionally
/// weighting nodes by label; see [Pruner::prune].
pub fn prune(
    tree: &mut MutationTree,
    max_num_nodes: usize,
    weights: Option<HashMap<String, f64>>,
) -> Result<PruneReport, PruneError> {
    let pruner = Pruner::new(max_num_nodes);
    match weights {
        Some(weights) => pruner.with_weights(weights).prune(tree),
        None => pruner.prune(tree),
    }
}

// ============================================================================
// Helpers
// ============================================================================
/// Removes the `num_pruned` least valuable nodes of a validated tree.
/// `weights` is indexed by arena index and updated in place.
fn condense(
    tree: &mut MutationTree,
    weights: &mut [f64],
    num_pruned: usize,
) -> Result<PruneReport, PruneError> {
    let root = tree.root_index()?;
    let order = tree.enumerate_nodes();

    // Keyed by stable index (position in `order`) to break ties deterministically
    let mut heap: BinaryHeap<Reverse<(Loss, usize)>> = order
        .iter()
        .enumerate()
        .filter(|&(_, &index)| index != root)
        .map(|(stable, &index)| Reverse((loss(tree, weights, index), stable)))
        .collect();

    let mut merged_into: Vec<Option<NodeIndex>> = vec![None; tree.arena_len()];
    let mut removed = Vec::with_capacity(num_pruned);
    for _ in 0..num_pruned {
        let index = pop_least_valuable(&mut heap, tree, weights, &order)?;

        let children = tree[index].children().to_vec();
        let parent = tree.remove_node(index)?;
        let weight = std::mem::take(&mut weights[index]);
        weights[parent] += weight;

        let prefix = std::mem::take(tree[index].mutations_mut());
        let prefix_length = tree[index].branch_length();
        for &child in &children {
            let node = &mut tree[child];
            let mut mutations = Vec::with_capacity(prefix.len() + node.num_mutations());
            mutations.extend_from_slice(&prefix);
            mutations.append(node.mutations_mut());
            node.set_mutations(mutations);
            if let (Some(a), Some(b)) = (prefix_length, node.branch_length()) {
                node.set_branch_length(Some(a + b));
            }
        }

        debug!(
            node = index,
            parent,
            num_mutations = prefix.len(),
            "Pruned node"
        );
        merged_into[index] = Some(parent);
        removed.push(index);
    }

    let mut renames = BTreeMap::new();
    for &index in &removed {
        let Some(label) = tree[index].label().map(str::to_string) else {
            continue;
        };
        let survivor = find_survivor(&mut merged_into, index);
        renames.insert(label, tree[survivor].label().map(str::to_string));
    }

    Ok(PruneReport {
        renames,
        num_pruned,
    })
}

/// Loss of a node, totally ordered so it can key a heap.
#[derive(Debug, Clone, Copy)]
struct Loss(f64);

impl PartialEq for Loss {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Loss {}

impl PartialOrd for Loss {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Loss {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn loss(tree: &MutationTree, weights: &[f64], index: NodeIndex) -> Loss {
    Loss(weights[index] * tree[index].num_mutations() as f64)
}

/// Pops heap entries until one is up to date and returns its node.
/// Stale entries are pushed back with their current loss.
fn pop_least_valuable(
    heap: &mut BinaryHeap<Reverse<(Loss, usize)>>,
    tree: &MutationTree,
    weights: &[f64],
    order: &[NodeIndex],
) -> Result<NodeIndex, PruneError> {
    loop {
        // Holds one entry per live non-root node, so never empty while pruning
        let Reverse((stale_loss, stable)) = heap.pop().ok_or(PruneError::Exhausted)?;
        let index = order[stable];
        let current_loss = loss(tree, weights, index);
        if current_loss == stale_loss {
            return Ok(index);
        }
        heap.push(Reverse((current_loss, stable)));
    }
}

/// Follows `merged_into` links from a removed node to the surviving
/// ancestor, compressing the path on the way.
fn find_survivor(merged_into: &mut [Option<NodeIndex>], index: NodeIndex) -> NodeIndex {
    let mut survivor = index;
    while let Some(next) = merged_into[survivor] {
        survivor = next;
    }

    let mut current = index;
    while let Some(next) = merged_into[current] {
        merged_into[current] = Some(survivor);
        current = next;
    }
    survivor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_survivor_compresses_chain() {
        // 3 -> 2 -> 1 -> 0
        let mut merged_into = vec![None, Some(0), Some(1), Some(2)];
        assert_eq!(find_survivor(&mut merged_into, 3), 0);
        assert_eq!(merged_into, vec![None, Some(0), Some(0), Some(0)]);
        assert_eq!(find_survivor(&mut merged_into, 0), 0);
    }

    #[test]
    fn test_loss_orders_by_value_then_index() {
        let mut heap = BinaryHeap::new();
        heap.push(Reverse((Loss(2.0), 0)));
        heap.push(Reverse((Loss(0.0), 5)));
        heap.push(Reverse((Loss(0.0), 3)));
        assert_eq!(heap.pop().map(|Reverse((_, i))| i), Some(3));
        assert_eq!(heap.pop().map(|Reverse((_, i))| i), Some(5));
        assert_eq!(heap.pop().map(|Reverse((_, i))| i), Some(0));
    }

    fn with_mutations(tree: &mut MutationTree, index: NodeIndex, notations: &[&str]) {
        let mutations = notations.iter().map(|m| m.parse().unwrap()).collect();
        tree[index].set_mutations(mutations);
    }

    #[test]
    fn test_weight_moves_to_immediate_parent_only() {
        // root -> x -> a -> {b, c}
        let mut tree = MutationTree::new();
        let root = tree.add_root().unwrap();
        let x = tree.add_child(root).unwrap();
        let a = tree.add_child(x).unwrap();
        let b = tree.add_child(a).unwrap();
        let c = tree.add_child(a).unwrap();
        with_mutations(&mut tree, x, &["A1C", "A2C", "A3C"]);
        with_mutations(&mut tree, a, &["A4C", "A5C"]);
        with_mutations(&mut tree, c, &["A6C"]);

        let mut weights = vec![1.0; tree.arena_len()];
        let report = condense(&mut tree, &mut weights, 1).unwrap();

        assert_eq!(report.num_pruned, 1);
        assert!(tree[b].is_detached());
        assert_eq!(weights[a], 2.0);
        assert_eq!(weights[x], 1.0);
        assert_eq!(weights[b], 0.0);
        assert_eq!(weights.iter().sum::<f64>(), 5.0);
    }

    #[test]
    fn test_weights_conserved_when_pruning_to_root() {
        let mut tree = crate::newick::parse_str("((C,D)B,(F)E)A;").unwrap();
        for index in tree.enumerate_nodes() {
            with_mutations(&mut tree, index, &["G7T"]);
        }

        let mut weights: Vec<f64> = (0..tree.arena_len()).map(|i| i as f64 + 0.5).collect();
        let total: f64 = weights.iter().sum();
        condense(&mut tree, &mut weights, 5).unwrap();

        assert_eq!(tree.num_nodes(), 1);
        assert_eq!(weights[tree.root_index().unwrap()], total);
    }
}
