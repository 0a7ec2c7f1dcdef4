//! Layered implementation ordering.
//!
//! Partitions every node into batches. A node lands in the first layer after
//! all of its dependencies have been placed, so everything inside one layer
//! can be built in parallel.
//!
//! When cycles leave no node ready, the engine takes every remaining node
//! that shares the minimum residual dependency count (dependencies not yet
//! placed) as the next layer. Each step places at least one node, so the
//! loop terminates after at most N layers.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use tracing::warn;

use super::store::GraphStore;

/// Compute implementation layers, each sorted by identifier.
///
/// Every node appears in exactly one layer. For an acyclic graph, each
/// node's layer index is strictly greater than the layer index of every
/// node it depends on.
#[must_use]
pub fn implementation_layers(store: &GraphStore) -> Vec<Vec<String>> {
    let mut residual: HashMap<NodeIndex, usize> = store
        .indices()
        .map(|idx| (idx, store.degree(idx, Direction::Outgoing)))
        .collect();

    let mut ready: Vec<NodeIndex> = residual
        .iter()
        .filter_map(|(idx, deg)| (*deg == 0).then_some(*idx))
        .collect();

    let mut layers: Vec<Vec<String>> = Vec::new();

    while !residual.is_empty() {
        let mut current = if ready.is_empty() {
            let fallback = min_residual_nodes(&residual);
            warn!(
                layer = layers.len(),
                tied = fallback.len(),
                "no dependency-free nodes left; taking nodes with fewest unresolved dependencies"
            );
            fallback
        } else {
            std::mem::take(&mut ready)
        };
        store.sort_by_label(&mut current);

        let placed: HashSet<NodeIndex> = current.iter().copied().collect();
        for idx in &current {
            residual.remove(idx);
        }

        for idx in &current {
            for dependent in store.sorted_dependent_indices(*idx) {
                if placed.contains(&dependent) {
                    continue;
                }
                if let Some(entry) = residual.get_mut(&dependent) {
                    if *entry > 0 {
                        *entry -= 1;
                        if *entry == 0 {
                            ready.push(dependent);
                        }
                    }
                }
            }
        }

        layers.push(store.labels(&current));
    }

    layers
}

/// All remaining nodes whose residual count equals the minimum.
fn min_residual_nodes(residual: &HashMap<NodeIndex, usize>) -> Vec<NodeIndex> {
    let Some(min) = residual.values().min().copied() else {
        return Vec::new();
    };
    residual
        .iter()
        .filter_map(|(idx, deg)| (*deg == min).then_some(*idx))
        .collect()
}
