//! In-memory directed memory graph.
//!
//! [`MemoryGraph`] is a projection over a backing store: nodes mirror
//! entries, edges capture referential, similarity, temporal, co-access and
//! causal relationships. The graph owns no persistence; dropping it releases
//! all state.
//!
//! Structural mutations funnel through [`MemoryGraph::add_node`],
//! [`MemoryGraph::add_edge`] and [`MemoryGraph::remove_node`], which keep the
//! reverse-edge index synchronised and flag derived PageRank state as stale
//! via the `dirty` flag.

mod community;
mod edges;
mod pagerank;
mod ranking;

pub use edges::SIMILARITY_SEARCH_K;
pub use ranking::{RankedResult, TopNode, DEFAULT_BLEND_ALPHA};

use crate::config::GraphConfig;
use crate::events::{EventBus, GraphEvent, GraphEventHandler};
use crate::models::{EdgeType, GraphEdge, GraphNode, MemoryEntry};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Snapshot of graph-level statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphStats {
    /// Number of nodes
    pub node_count: usize,

    /// Number of directed edges
    pub edge_count: usize,

    /// Mean out-degree, 0 for an empty graph
    pub avg_degree: f64,

    /// Number of distinct community labels currently stored
    pub community_count: usize,

    /// Whether the stored PageRank reflects the current structure
    pub pagerank_computed: bool,

    /// Largest stored PageRank score, 0 when none are present
    pub max_pagerank: f64,

    /// Smallest stored PageRank score, 0 when none are present
    pub min_pagerank: f64,
}

/// Directed multi-type graph over memory entries.
///
/// All pure-graph operations are synchronous, deterministic given input
/// order (community detection excepted, since it shuffles), and total:
/// missing ids yield empty results and capacity-exceeded inserts are
/// silent no-ops.
/// Callers sharing an instance across tasks must serialise externally.
#[derive(Debug)]
pub struct MemoryGraph {
    config: GraphConfig,
    nodes: HashMap<String, GraphNode>,
    /// Outgoing edges per node; insertion order is the tie-break order
    /// observed by community detection
    out: HashMap<String, Vec<GraphEdge>>,
    /// Reverse index: target id to the set of source ids pointing at it
    incoming: HashMap<String, HashSet<String>>,
    pagerank: HashMap<String, f64>,
    communities: HashMap<String, String>,
    dirty: bool,
    events: EventBus,
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGraph {
    /// Create a graph with the contract default configuration
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Create a graph with the given configuration
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            nodes: HashMap::new(),
            out: HashMap::new(),
            incoming: HashMap::new(),
            pagerank: HashMap::new(),
            communities: HashMap::new(),
            dirty: false,
            events: EventBus::default(),
        }
    }

    /// The configuration this graph was built with
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Register an event handler; handlers fire after state commit
    pub fn subscribe(&mut self, handler: Arc<dyn GraphEventHandler>) {
        self.events.subscribe(handler);
    }

    /// Register a closure as an event handler (convenience method)
    pub fn subscribe_fn<F>(&mut self, f: F)
    where
        F: Fn(&GraphEvent) + Send + Sync + 'static,
    {
        self.events.subscribe_fn(f);
    }

    /// Insert or replace the node projected from `entry`.
    ///
    /// Capacity-gated: when the graph already holds `max_nodes` nodes and
    /// `entry.id` is not among them, nothing happens and `false` is
    /// returned. Re-adding a known id replaces the node and is always
    /// accepted. Existing edges are untouched by a replace.
    pub fn add_node(&mut self, entry: &MemoryEntry) -> bool {
        if self.nodes.len() >= self.config.max_nodes && !self.nodes.contains_key(&entry.id) {
            debug!(id = %entry.id, max_nodes = self.config.max_nodes, "node rejected at capacity");
            return false;
        }

        let node = GraphNode::from(entry);
        self.out.entry(node.id.clone()).or_default();
        self.incoming.entry(node.id.clone()).or_default();
        self.nodes.insert(node.id.clone(), node);
        self.dirty = true;
        true
    }

    /// Add a directed edge, or reinforce an existing one.
    ///
    /// Both endpoints must already be nodes; otherwise this is a no-op.
    /// At most one edge exists per `(source, target)` pair: re-adding keeps
    /// the maximum weight and the original type. Returns `true` only when a
    /// new edge was appended.
    pub fn add_edge(&mut self, source: &str, target: &str, edge_type: EdgeType, weight: f64) -> bool {
        if !self.nodes.contains_key(source) || !self.nodes.contains_key(target) {
            return false;
        }

        let edges = self.out.entry(source.to_string()).or_default();
        if let Some(existing) = edges.iter_mut().find(|e| e.target == target) {
            existing.weight = existing.weight.max(weight);
            self.dirty = true;
            return false;
        }

        edges.push(GraphEdge::new(target, edge_type, weight));
        self.incoming
            .entry(target.to_string())
            .or_default()
            .insert(source.to_string());
        self.dirty = true;
        true
    }

    /// Remove a node and every incident edge, both directions.
    ///
    /// Also erases the node's PageRank score and community label. Unknown
    /// ids are a no-op returning `false`.
    pub fn remove_node(&mut self, id: &str) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }

        if let Some(edges) = self.out.remove(id) {
            for edge in edges {
                if let Some(sources) = self.incoming.get_mut(&edge.target) {
                    sources.remove(id);
                }
            }
        }
        if let Some(sources) = self.incoming.remove(id) {
            for source in sources {
                if let Some(edges) = self.out.get_mut(&source) {
                    edges.retain(|e| e.target != id);
                }
            }
        }

        self.nodes.remove(id);
        self.pagerank.remove(id);
        self.communities.remove(id);
        self.dirty = true;

        debug_assert!(self.incoming.values().all(|sources| !sources.contains(id)));
        true
    }

    /// Whether an edge `source -> target` exists
    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.out
            .get(source)
            .is_some_and(|edges| edges.iter().any(|e| e.target == target))
    }

    /// Whether `id` is a node of this graph
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges
    pub fn edge_count(&self) -> usize {
        self.out.values().map(|edges| edges.len()).sum()
    }

    /// Outgoing edges of `id`, in insertion order
    pub fn outgoing(&self, id: &str) -> &[GraphEdge] {
        self.out.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Ids of nodes with an edge pointing at `id`
    pub fn incoming_sources(&self, id: &str) -> Vec<&str> {
        self.incoming
            .get(id)
            .map(|sources| sources.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// The stored PageRank score of `id`, if one has been computed
    pub fn pagerank_of(&self, id: &str) -> Option<f64> {
        self.pagerank.get(id).copied()
    }

    /// The stored community label of `id`, if detection has run
    pub fn community_of(&self, id: &str) -> Option<&str> {
        self.communities.get(id).map(|s| s.as_str())
    }

    /// Whether structural mutations occurred since the last PageRank run
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Report graph-level statistics
    pub fn get_stats(&self) -> GraphStats {
        let node_count = self.nodes.len();
        let edge_count = self.edge_count();
        let avg_degree = if node_count > 0 {
            edge_count as f64 / node_count as f64
        } else {
            0.0
        };
        let community_count = self
            .communities
            .values()
            .collect::<HashSet<_>>()
            .len();
        let max_pagerank = self.pagerank.values().copied().fold(0.0, f64::max);
        let min_pagerank = if self.pagerank.is_empty() {
            0.0
        } else {
            self.pagerank.values().copied().fold(f64::INFINITY, f64::min)
        };

        GraphStats {
            node_count,
            edge_count,
            avg_degree,
            community_count,
            pagerank_computed: !self.dirty,
            max_pagerank,
            min_pagerank,
        }
    }

    // Internal accessors shared by the algorithm submodules.

    pub(crate) fn nodes_map(&self) -> &HashMap<String, GraphNode> {
        &self.nodes
    }

    pub(crate) fn out_map(&self) -> &HashMap<String, Vec<GraphEdge>> {
        &self.out
    }

    pub(crate) fn incoming_map(&self) -> &HashMap<String, HashSet<String>> {
        &self.incoming
    }

    pub(crate) fn events(&self) -> &EventBus {
        &self.events
    }

    pub(crate) fn set_pagerank(&mut self, ranks: HashMap<String, f64>) {
        self.pagerank = ranks;
        self.dirty = false;
    }

    pub(crate) fn pagerank_map(&self) -> &HashMap<String, f64> {
        &self.pagerank
    }

    pub(crate) fn set_communities(&mut self, labels: HashMap<String, String>) {
        self.communities = labels;
    }

    pub(crate) fn communities_map(&self) -> &HashMap<String, String> {
        &self.communities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryBuilder;

    fn entry(id: &str) -> MemoryEntry {
        EntryBuilder::new_with_content(format!("entry {id}")).id(id).build()
    }

    fn graph_with_nodes(ids: &[&str]) -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        for id in ids {
            graph.add_node(&entry(id));
        }
        graph
    }

    #[test]
    fn test_add_node_and_lookup() {
        let mut graph = MemoryGraph::new();
        assert!(graph.add_node(&entry("a")));
        assert!(graph.contains_node("a"));
        assert_eq!(graph.node_count(), 1);
        assert!(graph.is_dirty());
    }

    #[test]
    fn test_add_node_replaces_on_readd() {
        let mut graph = MemoryGraph::new();
        graph.add_node(&entry("a"));
        let updated = EntryBuilder::new_with_content("new")
            .id("a")
            .category("decision")
            .build();
        assert!(graph.add_node(&updated));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node("a").unwrap().category, "decision");
    }

    #[test]
    fn test_capacity_rejects_new_ids_only() {
        let config = GraphConfig {
            max_nodes: 3,
            ..Default::default()
        };
        let mut graph = MemoryGraph::with_config(config);
        for id in ["e1", "e2", "e3"] {
            assert!(graph.add_node(&entry(id)));
        }
        assert!(!graph.add_node(&entry("e4")));
        assert!(!graph.add_node(&entry("e5")));
        assert_eq!(graph.node_count(), 3);
        assert!(!graph.contains_node("e4"));

        // Re-adding a resident id is still accepted
        assert!(graph.add_node(&entry("e1")));
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_add_edge_maintains_reverse_index() {
        let mut graph = graph_with_nodes(&["a", "b"]);
        assert!(graph.add_edge("a", "b", EdgeType::Reference, 1.0));
        assert!(graph.has_edge("a", "b"));
        assert!(!graph.has_edge("b", "a"));
        assert_eq!(graph.incoming_sources("b"), vec!["a"]);
        assert_eq!(graph.outgoing("a").len(), 1);
    }

    #[test]
    fn test_add_edge_missing_endpoint_is_noop() {
        let mut graph = graph_with_nodes(&["a"]);
        assert!(!graph.add_edge("a", "ghost", EdgeType::Reference, 1.0));
        assert!(!graph.add_edge("ghost", "a", EdgeType::Reference, 1.0));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_readd_edge_keeps_max_weight_and_type() {
        let mut graph = graph_with_nodes(&["a", "b"]);
        assert!(graph.add_edge("a", "b", EdgeType::Reference, 1.0));
        assert!(!graph.add_edge("a", "b", EdgeType::Similar, 3.0));
        assert!(!graph.add_edge("a", "b", EdgeType::Similar, 2.0));

        let edges = graph.outgoing("a");
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].edge_type, EdgeType::Reference);
        assert_eq!(edges[0].weight, 3.0);
    }

    #[test]
    fn test_self_loop_allowed() {
        let mut graph = graph_with_nodes(&["a"]);
        assert!(graph.add_edge("a", "a", EdgeType::Causal, 1.0));
        assert!(graph.has_edge("a", "a"));
        assert_eq!(graph.incoming_sources("a"), vec!["a"]);
    }

    #[test]
    fn test_remove_node_erases_both_directions() {
        let mut graph = graph_with_nodes(&["a", "b", "c"]);
        graph.add_edge("a", "b", EdgeType::Reference, 1.0);
        graph.add_edge("b", "c", EdgeType::Reference, 1.0);
        graph.add_edge("c", "b", EdgeType::Reference, 1.0);

        assert!(graph.remove_node("b"));
        assert!(!graph.contains_node("b"));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.incoming_sources("c").is_empty());
        assert!(graph.outgoing("a").is_empty());
        assert!(!graph.remove_node("b"));
    }

    #[test]
    fn test_remove_node_drops_derived_state() {
        let mut graph = graph_with_nodes(&["a", "b"]);
        graph.add_edge("a", "b", EdgeType::Reference, 1.0);
        graph.compute_page_rank();
        graph.detect_communities();

        graph.remove_node("a");
        assert!(graph.pagerank_of("a").is_none());
        assert!(graph.community_of("a").is_none());
    }

    #[test]
    fn test_remove_node_with_self_loop() {
        let mut graph = graph_with_nodes(&["a", "b"]);
        graph.add_edge("a", "a", EdgeType::Causal, 1.0);
        graph.add_edge("a", "b", EdgeType::Reference, 1.0);
        assert!(graph.remove_node("a"));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.incoming_sources("b").is_empty());
    }

    #[test]
    fn test_add_then_remove_matches_empty_stats() {
        let empty_stats = MemoryGraph::new().get_stats();

        let mut graph = MemoryGraph::new();
        graph.add_node(&entry("a"));
        graph.remove_node("a");
        let stats = graph.get_stats();

        assert_eq!(stats.node_count, empty_stats.node_count);
        assert_eq!(stats.edge_count, empty_stats.edge_count);
        assert_eq!(stats.avg_degree, empty_stats.avg_degree);
        assert_eq!(stats.community_count, empty_stats.community_count);
        assert_eq!(stats.max_pagerank, empty_stats.max_pagerank);
        assert_eq!(stats.min_pagerank, empty_stats.min_pagerank);
    }

    #[test]
    fn test_stats_reflect_structure() {
        let mut graph = graph_with_nodes(&["a", "b"]);
        graph.add_edge("a", "b", EdgeType::Reference, 1.0);

        let stats = graph.get_stats();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.edge_count, 1);
        assert_eq!(stats.avg_degree, 0.5);
        assert!(!stats.pagerank_computed);
        assert_eq!(stats.max_pagerank, 0.0);
        assert_eq!(stats.min_pagerank, 0.0);

        graph.compute_page_rank();
        let stats = graph.get_stats();
        assert!(stats.pagerank_computed);
        assert!(stats.max_pagerank > stats.min_pagerank);
        assert!(stats.min_pagerank > 0.0);
    }

    #[test]
    fn test_dirty_lifecycle() {
        let mut graph = MemoryGraph::new();
        assert!(!graph.is_dirty());
        graph.add_node(&entry("a"));
        assert!(graph.is_dirty());
        graph.compute_page_rank();
        assert!(!graph.is_dirty());
        graph.add_node(&entry("b"));
        graph.add_edge("a", "b", EdgeType::Reference, 1.0);
        assert!(graph.is_dirty());
    }
}
