//! Blended ranking and neighbourhood queries.
//!
//! Similarity search results from the backing store are re-ranked by mixing
//! each hit's score with the structural importance of its node. PageRank
//! scores live in the `1/N` magnitude regime, so the structural term is
//! scaled by the node count to make it comparable with [0, 1] similarity
//! scores before blending.

use crate::graph::MemoryGraph;
use crate::models::MemoryEntry;
use crate::storage::SearchHit;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Default blend weight: 70% similarity, 30% structural importance
pub const DEFAULT_BLEND_ALPHA: f64 = 0.7;

/// A search hit re-scored against the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    /// The entry that matched the search
    pub entry: MemoryEntry,

    /// The similarity score reported by the backing store
    pub similarity: f32,

    /// Blended score the result list is ordered by
    pub combined: f64,

    /// Community label of the entry's node, when detection has run
    pub community: Option<String>,
}

/// One node from the top of the PageRank ordering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopNode {
    /// Node identifier
    pub id: String,

    /// PageRank score
    pub rank: f64,

    /// Community label, falling back to the node id when no label exists
    pub community: String,
}

impl MemoryGraph {
    /// Blend similarity scores with PageRank and re-rank.
    ///
    /// Recomputes PageRank first when the graph is dirty. Each hit scores
    /// `alpha * similarity + (1 - alpha) * pagerank * N` with
    /// `N = max(node_count, 1)`; entries unknown to the graph contribute
    /// zero structural weight. The sort is descending and stable, so equal
    /// scores keep their input order. `alpha = 1` recovers pure similarity,
    /// `alpha = 0` pure structural rank; see [`DEFAULT_BLEND_ALPHA`].
    pub fn rank_with_graph(&mut self, hits: Vec<SearchHit>, alpha: f64) -> Vec<RankedResult> {
        if self.is_dirty() {
            self.compute_page_rank();
        }

        let scale = self.node_count().max(1) as f64;
        let mut results: Vec<RankedResult> = hits
            .into_iter()
            .map(|hit| {
                let structural = self
                    .pagerank_map()
                    .get(&hit.entry.id)
                    .copied()
                    .unwrap_or(0.0)
                    * scale;
                let combined = alpha * hit.score as f64 + (1.0 - alpha) * structural;
                let community = self.communities_map().get(&hit.entry.id).cloned();
                RankedResult {
                    similarity: hit.score,
                    combined,
                    community,
                    entry: hit.entry,
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.combined
                .partial_cmp(&a.combined)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        debug!(results = results.len(), alpha, "ranked search hits");
        results
    }

    /// The `n` highest-ranked nodes, descending.
    ///
    /// Recomputes PageRank first when the graph is dirty. Each node carries
    /// its rank and community label; nodes without a label fall back to
    /// their own id.
    pub fn get_top_nodes(&mut self, n: usize) -> Vec<TopNode> {
        if self.is_dirty() {
            self.compute_page_rank();
        }

        let mut ranked: Vec<(&String, f64)> = self
            .pagerank_map()
            .iter()
            .map(|(id, rank)| (id, *rank))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });

        ranked
            .into_iter()
            .take(n)
            .map(|(id, rank)| TopNode {
                id: id.clone(),
                rank,
                community: self
                    .communities_map()
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| id.clone()),
            })
            .collect()
    }

    /// Ids reachable from `id` within `depth` forward hops.
    ///
    /// Breadth-first over outgoing edges with a global visited set, so each
    /// node appears once, in discovery order. The start id is excluded.
    /// Unknown ids and zero depth yield an empty result.
    pub fn get_neighbors(&self, id: &str, depth: usize) -> Vec<String> {
        if !self.contains_node(id) {
            return Vec::new();
        }

        let mut visited: HashSet<String> = HashSet::from([id.to_string()]);
        let mut frontier: Vec<String> = vec![id.to_string()];
        let mut reachable = Vec::new();

        for _ in 0..depth {
            let mut next = Vec::new();
            for current in &frontier {
                for edge in self.outgoing(current) {
                    if visited.insert(edge.target.clone()) {
                        reachable.push(edge.target.clone());
                        next.push(edge.target.clone());
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        reachable
    }
}
