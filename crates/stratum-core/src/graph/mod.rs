//! Dependency graph engine.
//!
//! # Overview
//!
//! This module holds the single [`GraphStore`] built during ingestion and the
//! read-only analysis passes that run over it. Every pass returns sorted,
//! deterministic output so two runs over the same inputs produce identical
//! plans.
//!
//! ## Pipeline
//!
//! ```text
//! CSV relationship sources
//!        ↓  ingest::build_graph()
//! GraphStore (DiGraph, edge A → B means "A depends on B")
//!   ├─ order::dependency_order()          → DependencyOrder
//!   ├─ transitive::transitive_dependencies() → BTreeSet<String>
//!   ├─ layers::implementation_layers()    → Vec<Vec<String>>
//!   └─ stats::GraphStats::from_store()    → GraphStats
//! ```
//!
//! ## Cycles
//!
//! Cycles are never fatal. The sorter appends blocked nodes in identifier
//! order and reports them as unresolved; the layering engine falls back to
//! the nodes with the fewest residual dependencies.
//!
//! ## Typical Usage
//!
//! ```rust
//! use stratum_core::graph::{GraphStore, GraphStats, dependency_order, implementation_layers};
//!
//! let mut store = GraphStore::new();
//! store.add_edge("App::run", "Config", None);
//! store.add_edge("Config", "Path", None);
//!
//! let order = dependency_order(&store);
//! assert_eq!(order.order, vec!["Path", "Config", "App::run"]);
//!
//! let layers = implementation_layers(&store);
//! assert_eq!(layers.len(), 3);
//!
//! let stats = GraphStats::from_store(&store);
//! assert_eq!(stats.edge_count, 2);
//! ```

pub mod layers;
pub mod order;
pub mod stats;
pub mod store;
pub mod transitive;

// Re-export primary types at module level for convenience.
pub use layers::implementation_layers;
pub use order::{DependencyOrder, dependency_order};
pub use stats::GraphStats;
pub use store::{GraphStore, MetadataValue, NodeMetadata};
pub use transitive::transitive_dependencies;
