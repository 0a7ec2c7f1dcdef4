//! Transitive dependency resolution.

use std::collections::{BTreeSet, HashSet, VecDeque};

use petgraph::graph::NodeIndex;

use super::store::GraphStore;

/// Every node reachable from `node` over dependency edges, sorted.
///
/// Breadth-first; each node is visited once. `node` itself is never part of
/// the result, even when a cycle leads back to it. Unknown nodes yield an
/// empty set.
#[must_use]
pub fn transitive_dependencies(store: &GraphStore, node: &str) -> BTreeSet<String> {
    let Some(start) = store.index(node) else {
        return BTreeSet::new();
    };

    let mut visited: HashSet<NodeIndex> = HashSet::new();
    visited.insert(start);
    let mut queue: VecDeque<NodeIndex> = VecDeque::from([start]);
    let mut reached = BTreeSet::new();

    while let Some(current) = queue.pop_front() {
        for dep in store.dependency_indices(current) {
            if visited.insert(dep) {
                if let Some(label) = store.label(dep) {
                    reached.insert(label.to_string());
                }
                queue.push_back(dep);
            }
        }
    }

    reached
}
