//! PageRank over the reverse-edge index.
//!
//! Power iteration with dangling-mass redistribution: the rank mass parked
//! on nodes without outgoing edges is spread uniformly inside the damped
//! term each iteration, keeping the score vector summing to 1. The inbound
//! sum divides by `max(out_degree, 1)`; a dangling source contributes zero
//! through that path and re-enters only via the dangling term. Do not fold
//! the two together: the defensive divisor is part of the contract and
//! biases contributions from isolated nodes relative to the canonical
//! formulation.

use crate::events::GraphEvent;
use crate::graph::MemoryGraph;
use std::collections::HashMap;
use tracing::{debug, trace};

impl MemoryGraph {
    /// Compute PageRank for every node and cache the result.
    ///
    /// Runs up to the configured iteration cap, halting early once the
    /// largest per-node delta drops below the convergence tolerance. Clears
    /// the dirty flag, emits [`GraphEvent::PageRankComputed`] with the
    /// iteration count, and returns a copy of the rank map. An empty graph
    /// yields an empty map and an event with zero iterations.
    pub fn compute_page_rank(&mut self) -> HashMap<String, f64> {
        let n = self.node_count();
        if n == 0 {
            self.set_pagerank(HashMap::new());
            self.events()
                .emit(GraphEvent::PageRankComputed { iterations: 0 });
            return HashMap::new();
        }

        let n_f = n as f64;
        let damping = self.config().pagerank_damping;
        let tolerance = self.config().pagerank_convergence;
        let max_iterations = self.config().pagerank_iterations;

        let mut ranks: HashMap<String, f64> = self
            .nodes_map()
            .keys()
            .map(|id| (id.clone(), 1.0 / n_f))
            .collect();

        let mut iterations = 0;
        for _ in 0..max_iterations {
            iterations += 1;

            let dangling_sum: f64 = ranks
                .iter()
                .filter(|(id, _)| self.out_map().get(id.as_str()).map_or(true, |e| e.is_empty()))
                .map(|(_, rank)| rank)
                .sum();

            let mut next = HashMap::with_capacity(n);
            let mut max_delta = 0.0f64;
            for id in self.nodes_map().keys() {
                let mut inbound = 0.0;
                if let Some(sources) = self.incoming_map().get(id) {
                    for source in sources {
                        let out_degree = self
                            .out_map()
                            .get(source)
                            .map(|edges| edges.len())
                            .unwrap_or(0)
                            .max(1);
                        inbound += ranks.get(source).copied().unwrap_or(0.0) / out_degree as f64;
                    }
                }

                let rank =
                    (1.0 - damping) / n_f + damping * (inbound + dangling_sum / n_f);
                let delta = (rank - ranks.get(id).copied().unwrap_or(0.0)).abs();
                if delta > max_delta {
                    max_delta = delta;
                }
                next.insert(id.clone(), rank);
            }

            ranks = next;
            trace!(iteration = iterations, max_delta, "pagerank iteration");
            if max_delta < tolerance {
                break;
            }
        }

        debug!(nodes = n, iterations, "pagerank converged");
        self.set_pagerank(ranks.clone());
        self.events()
            .emit(GraphEvent::PageRankComputed { iterations });
        ranks
    }
}
