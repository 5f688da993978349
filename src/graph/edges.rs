//! Edge construction: reference ingest and similarity enrichment.
//!
//! References declared on entries become `reference` edges at build time.
//! Similarity edges are pulled from the backing store's vector search and
//! are graph-local enrichment; the store is never written to.

use crate::events::GraphEvent;
use crate::graph::MemoryGraph;
use crate::models::{EdgeType, MemoryEntry};
use crate::storage::{BackingStore, QueryParams, SearchParams};
use crate::Result;
use tracing::debug;

/// Neighbourhood size requested from the store per similarity query
pub const SIMILARITY_SEARCH_K: usize = 20;

impl MemoryGraph {
    /// Populate the graph from an entry set.
    ///
    /// All nodes are added first, then a `reference` edge (weight 1.0) for
    /// every reference each entry declares. References to ids outside the
    /// set are silently dropped by `add_edge`. Emits
    /// [`GraphEvent::GraphBuilt`] once the build has committed.
    pub fn build_from_entries(&mut self, entries: &[MemoryEntry]) {
        for entry in entries {
            self.add_node(entry);
        }
        for entry in entries {
            for target in &entry.references {
                self.add_edge(&entry.id, target, EdgeType::Reference, 1.0);
            }
        }

        let node_count = self.node_count();
        debug!(
            node_count,
            edge_count = self.edge_count(),
            "graph built from entries"
        );
        self.events().emit(GraphEvent::GraphBuilt { node_count });
    }

    /// Query the backing store and build the graph from the result.
    ///
    /// Returns the node count after the build. Store failures propagate
    /// unchanged; the graph is untouched in that case.
    pub async fn build_from_store(
        &mut self,
        store: &dyn BackingStore,
        params: QueryParams,
    ) -> Result<usize> {
        let entries = store.query(params).await?;
        self.build_from_entries(&entries);
        Ok(self.node_count())
    }

    /// Enrich the neighbourhood of `entry_id` with `similar` edges.
    ///
    /// Fetches the entry, searches the store for its nearest neighbours
    /// (k = [`SIMILARITY_SEARCH_K`], cutoff = the configured
    /// `similarity_threshold`), and adds an edge per qualifying hit weighted
    /// by its similarity score. Returns the number of newly added edges;
    /// weight reinforcements of existing edges do not count.
    ///
    /// Returns 0 without touching the store when auto-edges are disabled,
    /// and 0 after a store round-trip when the entry is absent or carries no
    /// embedding. Store failures propagate; edges added before the failure
    /// remain, as each `add_edge` commits independently.
    pub async fn add_similarity_edges(
        &mut self,
        store: &dyn BackingStore,
        entry_id: &str,
    ) -> Result<usize> {
        if !self.config().enable_auto_edges {
            return Ok(0);
        }

        let Some(entry) = store.get(entry_id).await? else {
            return Ok(0);
        };
        let Some(embedding) = entry.embedding.as_deref() else {
            return Ok(0);
        };

        let threshold = self.config().similarity_threshold;
        let hits = store
            .search(
                embedding,
                SearchParams {
                    k: SIMILARITY_SEARCH_K,
                    threshold,
                },
            )
            .await?;

        let mut added = 0;
        for hit in hits {
            if hit.entry.id == entry_id || hit.score < threshold {
                continue;
            }
            if self.add_edge(entry_id, &hit.entry.id, EdgeType::Similar, hit.score as f64) {
                added += 1;
            }
        }

        debug!(id = entry_id, added, "similarity edges added");
        Ok(added)
    }

    /// Record that two entries were retrieved together.
    ///
    /// Adds a symmetric pair of `co-accessed` edges; repeat observations are
    /// absorbed by the max-weight rule.
    pub fn record_co_access(&mut self, a: &str, b: &str) {
        self.add_edge(a, b, EdgeType::CoAccessed, 1.0);
        self.add_edge(b, a, EdgeType::CoAccessed, 1.0);
    }

    /// Chain entries in time: a `temporal` edge from each id to its successor
    pub fn link_temporal_sequence(&mut self, ids: &[String]) {
        for pair in ids.windows(2) {
            self.add_edge(&pair[0], &pair[1], EdgeType::Temporal, 1.0);
        }
    }

    /// Record a cause-effect relationship between two entries
    pub fn link_causal(&mut self, cause: &str, effect: &str) -> bool {
        self.add_edge(cause, effect, EdgeType::Causal, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn entry(id: &str, references: &[&str]) -> MemoryEntry {
        EntryBuilder::new_with_content(format!("entry {id}"))
            .id(id)
            .references(references.iter().map(|r| r.to_string()).collect())
            .build()
    }

    #[test]
    fn test_build_from_entries_adds_nodes_then_reference_edges() {
        let entries = vec![
            entry("a", &["b", "c"]),
            entry("b", &["c"]),
            entry("c", &[]),
        ];

        let mut graph = MemoryGraph::new();
        graph.build_from_entries(&entries);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.has_edge("a", "b"));
        assert!(graph.has_edge("a", "c"));
        assert!(graph.has_edge("b", "c"));
        assert_eq!(graph.outgoing("a")[0].edge_type, EdgeType::Reference);
    }

    #[test]
    fn test_build_drops_references_to_unknown_ids() {
        let entries = vec![entry("a", &["ghost"])];
        let mut graph = MemoryGraph::new();
        graph.build_from_entries(&entries);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_build_forward_references_resolve() {
        // "a" references "b" which appears later in the set; the
        // nodes-first pass makes the edge land anyway.
        let entries = vec![entry("a", &["b"]), entry("b", &[])];
        let mut graph = MemoryGraph::new();
        graph.build_from_entries(&entries);
        assert!(graph.has_edge("a", "b"));
    }

    #[test]
    fn test_build_emits_graph_built_event() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);

        let mut graph = MemoryGraph::new();
        graph.subscribe_fn(move |event| {
            if let GraphEvent::GraphBuilt { node_count } = event {
                seen.store(*node_count, Ordering::SeqCst);
            }
        });
        graph.build_from_entries(&[entry("a", &[]), entry("b", &[])]);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_rebuild_from_same_entries_is_identical() {
        let entries = vec![entry("a", &["b"]), entry("b", &["a"])];

        let mut first = MemoryGraph::new();
        first.build_from_entries(&entries);
        let mut second = MemoryGraph::new();
        second.build_from_entries(&entries);

        assert_eq!(first.node_count(), second.node_count());
        assert_eq!(first.edge_count(), second.edge_count());
        for id in ["a", "b"] {
            assert_eq!(first.node(id), second.node(id));
            assert_eq!(first.outgoing(id), second.outgoing(id));
        }
    }

    #[test]
    fn test_co_access_links_both_directions() {
        let mut graph = MemoryGraph::new();
        graph.build_from_entries(&[entry("a", &[]), entry("b", &[])]);
        graph.record_co_access("a", "b");

        assert!(graph.has_edge("a", "b"));
        assert!(graph.has_edge("b", "a"));
        assert_eq!(graph.outgoing("a")[0].edge_type, EdgeType::CoAccessed);
    }

    #[test]
    fn test_temporal_sequence_chains_consecutive_ids() {
        let mut graph = MemoryGraph::new();
        graph.build_from_entries(&[entry("a", &[]), entry("b", &[]), entry("c", &[])]);
        let ids: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        graph.link_temporal_sequence(&ids);

        assert!(graph.has_edge("a", "b"));
        assert!(graph.has_edge("b", "c"));
        assert!(!graph.has_edge("a", "c"));
    }

    #[test]
    fn test_causal_link() {
        let mut graph = MemoryGraph::new();
        graph.build_from_entries(&[entry("cause", &[]), entry("effect", &[])]);
        assert!(graph.link_causal("cause", "effect"));
        assert!(!graph.link_causal("cause", "effect"));
        assert_eq!(graph.outgoing("cause")[0].edge_type, EdgeType::Causal);
    }
}
