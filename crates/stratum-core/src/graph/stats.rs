//! Aggregate statistics for the dependency graph.
//!
//! # Statistics Provided
//!
//! - **node_count**: Total number of symbols in the graph.
//! - **edge_count**: Total number of distinct dependency edges.
//! - **leaf_count**: Nodes with no dependencies (ready to implement).
//! - **root_count**: Nodes nothing depends on.
//! - **max_out_degree**: Most direct dependencies held by one node.
//! - **max_in_degree**: Most direct dependents held by one node.
//! - **avg_out_degree**: `edge_count / node_count`; zero on an empty graph.

use petgraph::Direction;
use serde::Serialize;

use super::store::GraphStore;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for a dependency graph.
///
/// Computed from a [`GraphStore`] by [`GraphStats::from_store`]. Every field
/// is zero for an empty graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of distinct dependency edges.
    pub edge_count: usize,
    /// Nodes with no dependencies.
    pub leaf_count: usize,
    /// Nodes with no dependents.
    pub root_count: usize,
    /// Highest number of direct dependencies on one node.
    pub max_out_degree: usize,
    /// Highest number of direct dependents on one node.
    pub max_in_degree: usize,
    /// Mean number of direct dependencies per node.
    pub avg_out_degree: f64,
}

impl GraphStats {
    /// Compute statistics from a [`GraphStore`].
    #[must_use]
    pub fn from_store(store: &GraphStore) -> Self {
        let node_count = store.node_count();
        let edge_count = store.edge_count();

        let max_degree = |direction: Direction| {
            store
                .indices()
                .map(|idx| store.degree(idx, direction))
                .max()
                .unwrap_or(0)
        };

        Self {
            node_count,
            edge_count,
            leaf_count: store.leaves().len(),
            root_count: store.roots().len(),
            max_out_degree: max_degree(Direction::Outgoing),
            max_in_degree: max_degree(Direction::Incoming),
            avg_out_degree: ratio(edge_count, node_count),
        }
    }
}

/// `numerator / denominator`, or 0.0 when the denominator is zero.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
