//! Regression tests over small, hand-checked graphs.

use std::collections::BTreeSet;

use stratum_core::graph::{
    GraphStats, GraphStore, dependency_order, implementation_layers, transitive_dependencies,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

// ---------------------------------------------------------------------------
// A→B, B→C, A→D
// ---------------------------------------------------------------------------

fn branching() -> GraphStore {
    let mut store = GraphStore::new();
    store.add_edge("A", "B", None);
    store.add_edge("B", "C", None);
    store.add_edge("A", "D", None);
    store
}

#[test]
fn branching_leaves() {
    assert_eq!(branching().leaves(), strings(&["C", "D"]));
}

#[test]
fn branching_order() {
    assert_eq!(dependency_order(&branching()).order, strings(&["C", "D", "B", "A"]));
}

#[test]
fn branching_layers() {
    assert_eq!(
        implementation_layers(&branching()),
        vec![strings(&["C", "D"]), strings(&["B"]), strings(&["A"])]
    );
}

#[test]
fn branching_transitive() {
    let store = branching();
    let expected: BTreeSet<String> = strings(&["B", "C", "D"]).into_iter().collect();
    assert_eq!(transitive_dependencies(&store, "A"), expected);
}

#[test]
fn branching_stats() {
    let stats = GraphStats::from_store(&branching());
    assert_eq!(stats.node_count, 4);
    assert_eq!(stats.edge_count, 3);
    assert_eq!(stats.leaf_count, 2);
    assert_eq!(stats.root_count, 1);
    assert_eq!(stats.max_out_degree, 2);
    assert_eq!(stats.max_in_degree, 1);
}

// ---------------------------------------------------------------------------
// A→B, B→A plus isolated C
// ---------------------------------------------------------------------------

fn two_cycle() -> GraphStore {
    let mut store = GraphStore::new();
    store.add_edge("A", "B", None);
    store.add_edge("B", "A", None);
    store.add_node("C", None);
    store
}

#[test]
fn two_cycle_leaves() {
    assert_eq!(two_cycle().leaves(), strings(&["C"]));
}

#[test]
fn two_cycle_order_appends_sorted_remainder() {
    let result = dependency_order(&two_cycle());
    assert_eq!(result.order.len(), 3);
    assert!(result.has_cycles());
    assert_eq!(result.order, strings(&["C", "A", "B"]));
    assert_eq!(result.unresolved, strings(&["A", "B"]));
}

#[test]
fn two_cycle_layers() {
    assert_eq!(
        implementation_layers(&two_cycle()),
        vec![strings(&["C"]), strings(&["A", "B"])]
    );
}

#[test]
fn two_cycle_transitive_excludes_self() {
    let store = two_cycle();
    let expected: BTreeSet<String> = strings(&["B"]).into_iter().collect();
    assert_eq!(transitive_dependencies(&store, "A"), expected);
}

// ---------------------------------------------------------------------------
// Duplicate edges from different relationship sources
// ---------------------------------------------------------------------------

#[test]
fn duplicate_edges_collapse_across_relationships() {
    use stratum_core::graph::{MetadataValue, NodeMetadata};

    let calls = NodeMetadata::from([("relationship".to_string(), MetadataValue::from("calls"))]);
    let returns =
        NodeMetadata::from([("relationship".to_string(), MetadataValue::from("returns"))]);

    let mut store = GraphStore::new();
    store.add_edge("App::Create", "App", Some(&calls));
    store.add_edge("App::Create", "App", Some(&returns));

    assert_eq!(store.edge_count(), 1);
    assert_eq!(
        store
            .metadata("App::Create")
            .and_then(|m| m.get("relationship")),
        Some(&MetadataValue::from("returns"))
    );
}
