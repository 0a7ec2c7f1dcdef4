//! Implementation plan and per-API report construction.
//!
//! [`ImplementationPlan`] bundles every analysis pass over one
//! [`GraphStore`]; [`ApiReport`] narrows the same data to a single node and
//! its transitive dependencies. Both serialize to the JSON files written by
//! [`write_plan`] and [`write_api_reports`].

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::graph::{
    DependencyOrder, GraphStats, GraphStore, NodeMetadata, dependency_order,
    implementation_layers, stats::ratio, transitive_dependencies,
};

/// File name of the full-run plan inside the output directory.
pub const PLAN_FILE: &str = "implementation_plan.json";

/// Sub-directory holding one JSON report per public API.
pub const API_REPORT_DIR: &str = "api_reports";

/// Metadata `type` value marking a public API node.
pub const PUBLIC_API_TYPE: &str = "public_api";

// ---------------------------------------------------------------------------
// ImplementationPlan
// ---------------------------------------------------------------------------

/// Graph statistics plus layering-derived fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanStatistics {
    #[serde(flatten)]
    pub graph: GraphStats,
    pub layer_count: usize,
    /// `node_count / layer_count`, zero when there are no layers.
    pub avg_layer_size: f64,
}

impl PlanStatistics {
    #[must_use]
    pub fn new(graph: GraphStats, layer_count: usize) -> Self {
        Self {
            avg_layer_size: ratio(graph.node_count, layer_count),
            layer_count,
            graph,
        }
    }

    /// Statistics plus a fresh layering pass over `store`.
    #[must_use]
    pub fn from_store(store: &GraphStore) -> Self {
        Self::new(
            GraphStats::from_store(store),
            implementation_layers(store).len(),
        )
    }
}

/// Everything computed for one run.
#[derive(Debug, Clone, Serialize)]
pub struct ImplementationPlan {
    pub total_nodes: usize,
    pub total_edges: usize,
    /// BLAKE3 hash of the node and edge sets.
    pub fingerprint: String,
    pub leaf_nodes: Vec<String>,
    pub implementation_order: Vec<String>,
    pub implementation_layers: Vec<Vec<String>>,
    /// Nodes the sorter could not place because of cycles.
    pub unresolved_cycle_nodes: Vec<String>,
    pub statistics: PlanStatistics,
}

impl ImplementationPlan {
    /// Run every analysis pass over `store`.
    #[must_use]
    #[instrument(skip_all, fields(nodes = store.node_count()))]
    pub fn from_store(store: &GraphStore) -> Self {
        let order = dependency_order(store);
        Self::with_order(store, &order)
    }

    /// Build a plan reusing an already computed dependency order.
    #[must_use]
    pub fn with_order(store: &GraphStore, order: &DependencyOrder) -> Self {
        let layers = implementation_layers(store);
        let statistics = PlanStatistics::new(GraphStats::from_store(store), layers.len());

        debug!(
            layers = statistics.layer_count,
            unresolved = order.unresolved.len(),
            "implementation plan computed"
        );

        Self {
            total_nodes: store.node_count(),
            total_edges: store.edge_count(),
            fingerprint: store.content_hash(),
            leaf_nodes: store.leaves(),
            implementation_order: order.order.clone(),
            implementation_layers: layers,
            unresolved_cycle_nodes: order.unresolved.clone(),
            statistics,
        }
    }
}

// ---------------------------------------------------------------------------
// ApiReport
// ---------------------------------------------------------------------------

/// Dependency report for a single node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiReport {
    pub api: String,
    pub metadata: NodeMetadata,
    pub direct_dependencies: Vec<String>,
    pub direct_dependents: Vec<String>,
    pub transitive_dependencies: Vec<String>,
    pub dependency_count: usize,
    /// Dependency-first order restricted to the node and what it reaches.
    pub implementation_order: Vec<String>,
}

impl ApiReport {
    /// Build the report for `node`, or `None` if the node is unknown.
    #[must_use]
    pub fn for_node(store: &GraphStore, order: &DependencyOrder, node: &str) -> Option<Self> {
        if !store.contains(node) {
            return None;
        }

        let transitive = transitive_dependencies(store, node);
        let mut scope: BTreeSet<String> = transitive.clone();
        scope.insert(node.to_string());

        Some(Self {
            api: node.to_string(),
            metadata: store.metadata(node).cloned().unwrap_or_default(),
            direct_dependencies: store.dependencies(node),
            direct_dependents: store.dependents(node),
            dependency_count: transitive.len(),
            transitive_dependencies: transitive.into_iter().collect(),
            implementation_order: order.restricted_to(&scope),
        })
    }
}

/// Nodes tagged `type = public_api`, sorted.
#[must_use]
pub fn public_api_nodes(store: &GraphStore) -> Vec<String> {
    store.nodes_with_metadata("type", PUBLIC_API_TYPE)
}

/// File-system-safe report name: `::`, `/`, `<` and `>` become `_`.
#[must_use]
pub fn safe_file_name(node: &str) -> String {
    node.replace("::", "_").replace(['/', '<', '>'], "_")
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write `implementation_plan.json` into `output_dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written.
pub fn write_plan(plan: &ImplementationPlan, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let path = output_dir.join(PLAN_FILE);
    write_json(&path, plan)?;
    info!(path = %path.display(), "implementation plan written");
    Ok(path)
}

/// Write one report per public API into `<output_dir>/api_reports/`.
///
/// Returns the number of reports written.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or any report cannot
/// be written.
#[instrument(skip_all, fields(dir = %output_dir.display()))]
pub fn write_api_reports(
    store: &GraphStore,
    order: &DependencyOrder,
    output_dir: &Path,
) -> Result<usize> {
    let dir = output_dir.join(API_REPORT_DIR);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let apis = public_api_nodes(store);
    let mut written: BTreeSet<String> = BTreeSet::new();

    for api in &apis {
        let Some(report) = ApiReport::for_node(store, order, api) else {
            continue;
        };
        let name = safe_file_name(api);
        if !written.insert(name.clone()) {
            warn!(api = %api, file = %name, "report file name collides; later report overwrites");
        }
        write_json(&dir.join(format!("{name}.json")), &report)?;
    }

    info!(reports = apis.len(), "API reports written");
    Ok(apis.len())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut body = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    body.push('\n');
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MetadataValue;
    use tempfile::TempDir;

    fn api_meta() -> NodeMetadata {
        NodeMetadata::from([("type".to_string(), MetadataValue::from(PUBLIC_API_TYPE))])
    }

    fn sample_store() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_node("firebase::App::Create", Some(&api_meta()));
        store.add_edge("firebase::App::Create", "firebase::AppOptions", None);
        store.add_edge("firebase::AppOptions", "std::string", None);
        store.add_edge("firebase::Auth::GetAuth", "firebase::App", None);
        store
    }

    #[test]
    fn plan_matches_graph() {
        let store = sample_store();
        let plan = ImplementationPlan::from_store(&store);

        assert_eq!(plan.total_nodes, 5);
        assert_eq!(plan.total_edges, 3);
        assert_eq!(plan.leaf_nodes, vec!["firebase::App", "std::string"]);
        assert_eq!(plan.implementation_order.len(), 5);
        assert!(plan.unresolved_cycle_nodes.is_empty());
        assert_eq!(plan.statistics.layer_count, 3);
        assert!((plan.statistics.avg_layer_size - 5.0 / 3.0).abs() < 1e-9);
        assert!(plan.fingerprint.starts_with("blake3:"));
    }

    #[test]
    fn empty_plan_has_zero_statistics() {
        let plan = ImplementationPlan::from_store(&GraphStore::new());
        assert_eq!(plan.statistics, PlanStatistics::default());
        assert!(plan.implementation_layers.is_empty());
    }

    #[test]
    fn statistics_serialize_flat() {
        let plan = ImplementationPlan::from_store(&sample_store());
        let value = serde_json::to_value(&plan).expect("serialize");
        let stats = &value["statistics"];
        assert_eq!(stats["node_count"], 5);
        assert_eq!(stats["layer_count"], 3);
        assert!(stats.get("graph").is_none());
    }

    #[test]
    fn api_report_scopes_order_to_reachable_nodes() {
        let store = sample_store();
        let order = dependency_order(&store);
        let report =
            ApiReport::for_node(&store, &order, "firebase::App::Create").expect("known node");

        assert_eq!(report.direct_dependencies, vec!["firebase::AppOptions"]);
        assert!(report.direct_dependents.is_empty());
        assert_eq!(
            report.transitive_dependencies,
            vec!["firebase::AppOptions", "std::string"]
        );
        assert_eq!(report.dependency_count, 2);
        assert_eq!(
            report.implementation_order,
            vec!["std::string", "firebase::AppOptions", "firebase::App::Create"]
        );
        assert_eq!(
            report.metadata.get("type"),
            Some(&MetadataValue::from(PUBLIC_API_TYPE))
        );
    }

    #[test]
    fn api_report_for_unknown_node_is_none() {
        let store = sample_store();
        let order = dependency_order(&store);
        assert!(ApiReport::for_node(&store, &order, "nope").is_none());
    }

    #[test]
    fn safe_file_name_replaces_separators() {
        assert_eq!(
            safe_file_name("firebase::Future<firebase::App>/x"),
            "firebase_Future_firebase_App__x"
        );
    }

    #[test]
    fn writers_create_output_tree() {
        let dir = TempDir::new().expect("tempdir");
        let out = dir.path().join("nested/out");
        let store = sample_store();
        let order = dependency_order(&store);
        let plan = ImplementationPlan::with_order(&store, &order);

        let plan_path = write_plan(&plan, &out).expect("write plan");
        assert!(plan_path.is_file());

        let written = write_api_reports(&store, &order, &out).expect("write reports");
        assert_eq!(written, 1);
        let report_path = out.join(API_REPORT_DIR).join("firebase_App_Create.json");
        let body = std::fs::read_to_string(report_path).expect("read report");
        let value: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(value["api"], "firebase::App::Create");
        assert_eq!(value["dependency_count"], 2);
    }
}
