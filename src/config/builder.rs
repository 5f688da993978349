//! Fluent builder for graph configuration

use crate::config::{CommunityAlgorithm, GraphConfig};
use crate::{MemographError, Result};

/// Builder for [`GraphConfig`].
///
/// # Example
///
/// ```rust
/// use memograph::config::GraphConfig;
///
/// let config = GraphConfig::builder()
///     .similarity_threshold(0.75)
///     .max_nodes(1000)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_nodes, 1000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphConfigBuilder {
    config: GraphConfig,
}

impl GraphConfigBuilder {
    /// Create a builder seeded with the contract defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum similarity score for automatic `similar` edges
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// PageRank damping factor
    pub fn pagerank_damping(mut self, damping: f64) -> Self {
        self.config.pagerank_damping = damping;
        self
    }

    /// Maximum PageRank power iterations per call
    pub fn pagerank_iterations(mut self, iterations: usize) -> Self {
        self.config.pagerank_iterations = iterations;
        self
    }

    /// Convergence tolerance for the PageRank fixed point
    pub fn pagerank_convergence(mut self, tolerance: f64) -> Self {
        self.config.pagerank_convergence = tolerance;
        self
    }

    /// Hard cap on node count
    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.config.max_nodes = max_nodes;
        self
    }

    /// Whether the edge builder may issue similarity searches
    pub fn enable_auto_edges(mut self, enabled: bool) -> Self {
        self.config.enable_auto_edges = enabled;
        self
    }

    /// Which community detection algorithm to run
    pub fn community_algorithm(mut self, algorithm: CommunityAlgorithm) -> Self {
        self.config.community_algorithm = algorithm;
        self
    }

    /// Validate and build the final configuration
    pub fn build(self) -> Result<GraphConfig> {
        self.config
            .validate()
            .map_err(MemographError::Configuration)?;
        Ok(self.config)
    }
}
