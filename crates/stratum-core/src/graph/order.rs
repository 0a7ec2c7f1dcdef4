//! Dependency-first topological ordering.
//!
//! Kahn's algorithm over out-degree: a node becomes ready once every node it
//! depends on has been emitted. Ties inside a ready frontier break by
//! identifier, and dependents are visited in identifier order, so the result
//! is fully deterministic.
//!
//! Nodes still blocked when the queue drains sit on (or behind) a cycle.
//! They are appended in identifier order and reported in
//! [`DependencyOrder::unresolved`].

use std::collections::{BTreeSet, HashMap, VecDeque};

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::warn;

use super::store::GraphStore;

/// Output of [`dependency_order`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyOrder {
    /// Every node exactly once, dependencies before dependents where possible.
    pub order: Vec<String>,
    /// Nodes that could not be ordered because of cycles, sorted.
    ///
    /// These also appear at the tail of `order`.
    pub unresolved: Vec<String>,
}

impl DependencyOrder {
    /// Return `true` if the graph contained at least one cycle.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        !self.unresolved.is_empty()
    }

    /// The order filtered to `subset`, keeping relative positions.
    #[must_use]
    pub fn restricted_to(&self, subset: &BTreeSet<String>) -> Vec<String> {
        self.order
            .iter()
            .filter(|node| subset.contains(*node))
            .cloned()
            .collect()
    }
}

/// Order every node so that each appears after all of its dependencies.
///
/// For an acyclic graph, every edge `A → B` places `B` strictly before `A`.
/// With cycles, the blocked remainder is appended sorted and a warning is
/// logged once with its size.
#[must_use]
pub fn dependency_order(store: &GraphStore) -> DependencyOrder {
    let mut degree: HashMap<NodeIndex, usize> = store
        .indices()
        .map(|idx| (idx, store.degree(idx, Direction::Outgoing)))
        .collect();

    let mut seeds: Vec<NodeIndex> = degree
        .iter()
        .filter_map(|(idx, deg)| (*deg == 0).then_some(*idx))
        .collect();
    store.sort_by_label(&mut seeds);

    let mut queue: VecDeque<NodeIndex> = seeds.into();
    let mut emitted: Vec<NodeIndex> = Vec::with_capacity(store.node_count());

    while let Some(idx) = queue.pop_front() {
        emitted.push(idx);
        degree.remove(&idx);

        for dependent in store.sorted_dependent_indices(idx) {
            if let Some(entry) = degree.get_mut(&dependent) {
                *entry = entry.saturating_sub(1);
                if *entry == 0 {
                    queue.push_back(dependent);
                }
            }
        }
    }

    let mut order = store.labels(&emitted);

    let mut blocked: Vec<NodeIndex> = degree.into_keys().collect();
    store.sort_by_label(&mut blocked);
    let unresolved = store.labels(&blocked);

    if !unresolved.is_empty() {
        warn!(
            unresolved = unresolved.len(),
            "dependency cycle detected; appending blocked nodes in identifier order"
        );
        order.extend(unresolved.iter().cloned());
    }

    DependencyOrder { order, unresolved }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
