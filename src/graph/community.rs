//! Community detection via weighted asynchronous label propagation.
//!
//! Every node starts as its own label. Each sweep visits the nodes in a
//! freshly shuffled order and adopts the label with the strongest
//! neighbourhood support: outgoing edges vote with their weight, incoming
//! neighbours vote with 1.0. Ties keep the label seen first in iteration
//! order. The sweep loop stops once a full pass changes nothing.
//!
//! The procedure is intentionally non-deterministic across runs. Tests
//! inject a seeded random source and assert partition properties rather
//! than label identity.

use crate::config::CommunityAlgorithm;
use crate::events::GraphEvent;
use crate::graph::MemoryGraph;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Upper bound on label-propagation sweeps per detection run
const MAX_SWEEPS: usize = 20;

impl MemoryGraph {
    /// Detect communities using the ambient random source.
    ///
    /// Returns the number of distinct labels found and emits
    /// [`GraphEvent::CommunitiesDetected`] once the labelling is stored.
    pub fn detect_communities(&mut self) -> usize {
        self.detect_communities_with(&mut rand::thread_rng())
    }

    /// Detect communities using an injected random source.
    ///
    /// Deterministic given the source, which makes it the entry point for
    /// reproducible tests.
    pub fn detect_communities_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        if self.config().community_algorithm == CommunityAlgorithm::Louvain {
            warn!("louvain is not implemented; falling back to label propagation");
        }
        self.propagate_labels(rng)
    }

    fn propagate_labels<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut labels: HashMap<String, String> = self
            .nodes_map()
            .keys()
            .map(|id| (id.clone(), id.clone()))
            .collect();

        // Sorted base order so a seeded source yields a reproducible shuffle
        let mut visit_order: Vec<String> = self.nodes_map().keys().cloned().collect();
        visit_order.sort();

        let mut sweeps = 0;
        for _ in 0..MAX_SWEEPS {
            sweeps += 1;
            visit_order.shuffle(rng);

            let mut changed = false;
            for id in &visit_order {
                if let Some(winner) = self.strongest_neighbour_label(id, &labels) {
                    if labels.get(id) != Some(&winner) {
                        labels.insert(id.clone(), winner);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        let community_count = labels.values().collect::<HashSet<_>>().len();
        debug!(sweeps, community_count, "label propagation finished");
        self.set_communities(labels);
        self.events()
            .emit(GraphEvent::CommunitiesDetected { community_count });
        community_count
    }

    /// Aggregate per-label support around `id` and pick the strongest.
    ///
    /// Outgoing edges contribute their weight, incoming neighbours 1.0.
    /// Returns `None` when no neighbour contributed; on ties the label
    /// encountered first wins.
    fn strongest_neighbour_label(
        &self,
        id: &str,
        labels: &HashMap<String, String>,
    ) -> Option<String> {
        let mut scores: HashMap<&str, f64> = HashMap::new();
        let mut seen_order: Vec<&str> = Vec::new();

        for edge in self.outgoing(id) {
            if let Some(label) = labels.get(&edge.target) {
                let slot = scores.entry(label.as_str()).or_insert_with(|| {
                    seen_order.push(label.as_str());
                    0.0
                });
                *slot += edge.weight;
            }
        }
        if let Some(sources) = self.incoming_map().get(id) {
            for source in sources {
                if let Some(label) = labels.get(source) {
                    let slot = scores.entry(label.as_str()).or_insert_with(|| {
                        seen_order.push(label.as_str());
                        0.0
                    });
                    *slot += 1.0;
                }
            }
        }

        let mut best: Option<(&str, f64)> = None;
        for label in seen_order {
            let score = scores[label];
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((label, score)),
            }
        }
        best.map(|(label, _)| label.to_string())
    }
}
