//! The dependency graph store.
//!
//! # Overview
//!
//! [`GraphStore`] owns every node identifier, the forward and reverse
//! adjacency indices, and per-node metadata. It is populated once during
//! ingestion (insert-only) and then read by the analysis passes in
//! [`crate::graph::order`], [`crate::graph::transitive`],
//! [`crate::graph::layers`] and [`crate::graph::stats`].
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A **depends on** B": B must exist before A can be
//! fully implemented. The outgoing neighbours of a node are its
//! *dependencies*; the incoming neighbours are its *dependents*.
//!
//! Both indices live in a single petgraph [`DiGraph`], so the reverse index
//! is always the exact mirror of the forward index.
//!
//! ## Interning
//!
//! Each identifier is stored once as a node weight and looked up through
//! `node_map`. Edges are a set: inserting the same `(from, to)` pair twice
//! (even from different relationship sources) keeps a single edge.
//!
//! ## Metadata
//!
//! Metadata merges key-wise with last-writer-wins semantics. A relationship
//! kind is recorded on the `from` node only; it never becomes part of the
//! edge identity.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// A single metadata value attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Boolean flag such as `is_static`.
    Flag(bool),
    /// Free-form text such as a class name or relationship kind.
    Text(String),
}

impl MetadataValue {
    /// Return the text payload, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Flag(_) => None,
        }
    }

    /// Return the flag payload, if this is a boolean value.
    #[must_use]
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Key/value metadata for one node. Ordered so serialized reports are stable.
pub type NodeMetadata = BTreeMap<String, MetadataValue>;

// ---------------------------------------------------------------------------
// GraphStore
// ---------------------------------------------------------------------------

/// A directed dependency graph keyed by symbol identifier.
///
/// Nodes are fully qualified symbol names. An edge `A → B` means
/// "A depends on B". See the module docs for the full contract.
#[derive(Debug, Default, Clone)]
pub struct GraphStore {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
    metadata: HashMap<NodeIndex, NodeMetadata>,
}

impl GraphStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `from` depends on `to`.
    ///
    /// Silently ignored when either identifier is empty (or whitespace only)
    /// or when `from == to`. Otherwise both endpoints are registered, the edge
    /// is added once, and `metadata` is merged into `from`'s metadata.
    pub fn add_edge(&mut self, from: &str, to: &str, metadata: Option<&NodeMetadata>) {
        if !is_valid_id(from) || !is_valid_id(to) || from == to {
            return;
        }

        let from_idx = self.intern(from);
        let to_idx = self.intern(to);

        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }

        if let Some(metadata) = metadata {
            self.merge_metadata(from_idx, metadata);
        }
    }

    /// Register `node` without any edges and merge `metadata` into it.
    ///
    /// Calling this for an existing node only merges metadata. Empty
    /// identifiers are ignored.
    pub fn add_node(&mut self, node: &str, metadata: Option<&NodeMetadata>) {
        if !is_valid_id(node) {
            return;
        }

        let idx = self.intern(node);
        if let Some(metadata) = metadata {
            self.merge_metadata(idx, metadata);
        }
    }

    /// Nodes with no dependencies, sorted by identifier.
    ///
    /// These are the natural starting points for implementation.
    #[must_use]
    pub fn leaves(&self) -> Vec<String> {
        self.nodes_without(Direction::Outgoing)
    }

    /// Nodes nothing depends on, sorted by identifier.
    #[must_use]
    pub fn roots(&self) -> Vec<String> {
        self.nodes_without(Direction::Incoming)
    }

    /// Return `true` if `node` is registered.
    #[must_use]
    pub fn contains(&self, node: &str) -> bool {
        self.node_map.contains_key(node)
    }

    /// Return the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of distinct dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Return `true` if no node has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All node identifiers, sorted.
    #[must_use]
    pub fn nodes(&self) -> Vec<String> {
        let mut nodes: Vec<String> = self.graph.node_weights().cloned().collect();
        nodes.sort_unstable();
        nodes
    }

    /// Direct dependencies of `node`, sorted. Empty for unknown nodes.
    #[must_use]
    pub fn dependencies(&self, node: &str) -> Vec<String> {
        self.neighbours(node, Direction::Outgoing)
    }

    /// Direct dependents of `node`, sorted. Empty for unknown nodes.
    #[must_use]
    pub fn dependents(&self, node: &str) -> Vec<String> {
        self.neighbours(node, Direction::Incoming)
    }

    /// Number of direct dependencies of `node` (0 for unknown nodes).
    #[must_use]
    pub fn out_degree(&self, node: &str) -> usize {
        self.index(node)
            .map_or(0, |idx| self.degree(idx, Direction::Outgoing))
    }

    /// Number of direct dependents of `node` (0 for unknown nodes).
    #[must_use]
    pub fn in_degree(&self, node: &str) -> usize {
        self.index(node)
            .map_or(0, |idx| self.degree(idx, Direction::Incoming))
    }

    /// Metadata recorded for `node`, if any.
    #[must_use]
    pub fn metadata(&self, node: &str) -> Option<&NodeMetadata> {
        self.index(node).and_then(|idx| self.metadata.get(&idx))
    }

    /// Nodes whose metadata has `key` set to the text `value`, sorted.
    #[must_use]
    pub fn nodes_with_metadata(&self, key: &str, value: &str) -> Vec<String> {
        let mut nodes: Vec<String> = self
            .metadata
            .iter()
            .filter(|(_, meta)| meta.get(key).and_then(MetadataValue::as_text) == Some(value))
            .filter_map(|(idx, _)| self.label(*idx).map(str::to_string))
            .collect();
        nodes.sort_unstable();
        nodes
    }

    /// BLAKE3 hash of the sorted node list and sorted edge list.
    ///
    /// Changes whenever a node or edge is added; metadata is not included.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut edges: Vec<(&str, &str)> = self
            .graph
            .edge_references()
            .filter_map(|edge| Some((self.label(edge.source())?, self.label(edge.target())?)))
            .collect();
        edges.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        for node in self.nodes() {
            hasher.update(node.as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"\x01");
        for (from, to) in edges {
            hasher.update(from.as_bytes());
            hasher.update(b"\x00");
            hasher.update(to.as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }

    // -----------------------------------------------------------------------
    // Crate-internal index access for the analysis passes
    // -----------------------------------------------------------------------

    pub(crate) fn index(&self, node: &str) -> Option<NodeIndex> {
        self.node_map.get(node).copied()
    }

    pub(crate) fn label(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    pub(crate) fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Dependency indices of `idx` (unordered).
    pub(crate) fn dependency_indices(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Outgoing)
    }

    /// Dependent indices of `idx`, sorted by identifier.
    pub(crate) fn sorted_dependent_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut dependents: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect();
        self.sort_by_label(&mut dependents);
        dependents
    }

    pub(crate) fn degree(&self, idx: NodeIndex, direction: Direction) -> usize {
        self.graph.neighbors_directed(idx, direction).count()
    }

    /// Sort indices ascending by their identifier.
    pub(crate) fn sort_by_label(&self, indices: &mut [NodeIndex]) {
        indices.sort_by(|a, b| self.label(*a).cmp(&self.label(*b)));
    }

    pub(crate) fn labels(&self, indices: &[NodeIndex]) -> Vec<String> {
        indices
            .iter()
            .filter_map(|idx| self.label(*idx).map(str::to_string))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn intern(&mut self, node: &str) -> NodeIndex {
        if let Some(idx) = self.node_map.get(node) {
            return *idx;
        }
        let idx = self.graph.add_node(node.to_string());
        self.node_map.insert(node.to_string(), idx);
        idx
    }

    fn merge_metadata(&mut self, idx: NodeIndex, metadata: &NodeMetadata) {
        if metadata.is_empty() {
            return;
        }
        self.metadata
            .entry(idx)
            .or_default()
            .extend(metadata.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    fn nodes_without(&self, direction: Direction) -> Vec<String> {
        let mut nodes: Vec<String> = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph.neighbors_directed(idx, direction).next().is_none())
            .filter_map(|idx| self.label(idx).map(str::to_string))
            .collect();
        nodes.sort_unstable();
        nodes
    }

    fn neighbours(&self, node: &str, direction: Direction) -> Vec<String> {
        let Some(idx) = self.index(node) else {
            return Vec::new();
        };
        let mut out: Vec<String> = self
            .graph
            .neighbors_directed(idx, direction)
            .filter_map(|n| self.label(n).map(str::to_string))
            .collect();
        out.sort_unstable();
        out
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.trim().is_empty()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pairs: &[(&str, &str)]) -> NodeMetadata {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), MetadataValue::from(*v)))
            .collect()
    }

    #[test]
    fn empty_store_has_no_nodes() {
        let store = GraphStore::new();
        assert!(store.is_empty());
        assert_eq!(store.node_count(), 0);
        assert_eq!(store.edge_count(), 0);
        assert!(store.leaves().is_empty());
        assert!(store.roots().is_empty());
        assert!(store.content_hash().starts_with("blake3:"));
    }

    #[test]
    fn self_loop_is_dropped() {
        let mut store = GraphStore::new();
        store.add_edge("A", "A", None);
        assert_eq!(store.node_count(), 0);
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn empty_endpoints_are_dropped() {
        let mut store = GraphStore::new();
        store.add_edge("", "B", None);
        store.add_edge("A", "", None);
        store.add_edge("   ", "B", None);
        assert_eq!(store.node_count(), 0);
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn empty_standalone_node_is_dropped() {
        let mut store = GraphStore::new();
        store.add_node("", Some(&meta(&[("type", "public_api")])));
        assert!(store.is_empty());
    }

    #[test]
    fn edge_registers_both_endpoints_and_mirrors() {
        let mut store = GraphStore::new();
        store.add_edge("A", "B", None);

        assert!(store.contains("A"));
        assert!(store.contains("B"));
        assert_eq!(store.dependencies("A"), vec!["B".to_string()]);
        assert_eq!(store.dependents("B"), vec!["A".to_string()]);
        assert!(store.dependencies("B").is_empty());
        assert!(store.dependents("A").is_empty());
    }

    #[test]
    fn duplicate_edges_collapse() {
        let mut store = GraphStore::new();
        store.add_edge("A", "B", Some(&meta(&[("relationship", "calls")])));
        store.add_edge("A", "B", Some(&meta(&[("relationship", "uses_type")])));
        assert_eq!(store.edge_count(), 1);
        assert_eq!(store.out_degree("A"), 1);
        assert_eq!(store.in_degree("B"), 1);
    }

    #[test]
    fn metadata_merges_last_writer_wins() {
        let mut store = GraphStore::new();
        store.add_node("A", Some(&meta(&[("type", "public_api"), ("class", "App")])));
        store.add_edge("A", "B", Some(&meta(&[("relationship", "calls")])));
        store.add_edge("A", "C", Some(&meta(&[("relationship", "returns")])));

        let a = store.metadata("A").expect("A has metadata");
        assert_eq!(a.get("type"), Some(&MetadataValue::from("public_api")));
        assert_eq!(a.get("class"), Some(&MetadataValue::from("App")));
        assert_eq!(a.get("relationship"), Some(&MetadataValue::from("returns")));
        // Metadata attaches to the `from` side only.
        assert!(store.metadata("B").is_none());
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut store = GraphStore::new();
        store.add_node("A", None);
        store.add_node("A", None);
        assert_eq!(store.node_count(), 1);
        assert!(store.metadata("A").is_none());
    }

    #[test]
    fn leaves_and_roots_are_sorted() {
        let mut store = GraphStore::new();
        store.add_edge("A", "B", None);
        store.add_edge("B", "C", None);
        store.add_edge("A", "D", None);
        store.add_node("Z", None);

        assert_eq!(store.leaves(), vec!["C", "D", "Z"]);
        assert_eq!(store.roots(), vec!["A", "Z"]);
    }

    #[test]
    fn unknown_node_queries_are_empty() {
        let store = GraphStore::new();
        assert!(store.dependencies("nope").is_empty());
        assert!(store.dependents("nope").is_empty());
        assert_eq!(store.out_degree("nope"), 0);
        assert_eq!(store.in_degree("nope"), 0);
        assert!(store.metadata("nope").is_none());
    }

    #[test]
    fn nodes_with_metadata_filters_on_text_value() {
        let mut store = GraphStore::new();
        store.add_node("b::api", Some(&meta(&[("type", "public_api")])));
        store.add_node("a::api", Some(&meta(&[("type", "public_api")])));
        store.add_edge("c::impl", "b::api", Some(&meta(&[("relationship", "calls")])));

        assert_eq!(
            store.nodes_with_metadata("type", "public_api"),
            vec!["a::api", "b::api"]
        );
        assert!(store.nodes_with_metadata("type", "internal").is_empty());
    }

    #[test]
    fn content_hash_tracks_structure() {
        let mut store = GraphStore::new();
        store.add_node("A", None);
        let nodes_only = store.content_hash();

        store.add_edge("A", "B", None);
        let with_edge = store.content_hash();
        assert_ne!(nodes_only, with_edge);

        // Insertion order does not matter.
        let mut other = GraphStore::new();
        other.add_edge("A", "B", None);
        assert_eq!(other.content_hash(), with_edge);
    }

    #[test]
    fn metadata_values_serialize_untagged() {
        let value = serde_json::to_value(meta(&[("class", "App")])).expect("serialize");
        assert_eq!(value["class"], "App");

        let mut flags = NodeMetadata::new();
        flags.insert("is_static".to_string(), MetadataValue::from(true));
        let value = serde_json::to_value(flags).expect("serialize");
        assert_eq!(value["is_static"], true);
    }
}
