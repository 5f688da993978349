//! Configuration for the memory graph core.
//!
//! All knobs have contract defaults; construction goes through
//! [`GraphConfig::default`], a deserialized document, or the fluent
//! [`GraphConfigBuilder`].

mod builder;

pub use builder::GraphConfigBuilder;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Community detection algorithm selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CommunityAlgorithm {
    /// Weighted asynchronous label propagation (contracted algorithm)
    #[default]
    LabelPropagation,
    /// Reserved; currently falls back to label propagation with a warning
    Louvain,
}

impl fmt::Display for CommunityAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LabelPropagation => write!(f, "label-propagation"),
            Self::Louvain => write!(f, "louvain"),
        }
    }
}

/// Configuration for a [`MemoryGraph`](crate::graph::MemoryGraph) instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
    /// Minimum similarity score for automatic `similar` edges
    pub similarity_threshold: f32,

    /// PageRank damping factor
    pub pagerank_damping: f64,

    /// Maximum PageRank power iterations per call
    pub pagerank_iterations: usize,

    /// Convergence tolerance: iteration stops once the largest per-node
    /// rank delta falls below this value
    pub pagerank_convergence: f64,

    /// Hard cap on node count; inserts of new ids beyond it are no-ops
    pub max_nodes: usize,

    /// Whether the edge builder may issue similarity searches to the store
    pub enable_auto_edges: bool,

    /// Which community detection algorithm to run
    pub community_algorithm: CommunityAlgorithm,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.8,
            pagerank_damping: 0.85,
            pagerank_iterations: 50,
            pagerank_convergence: 1e-6,
            max_nodes: 5000,
            enable_auto_edges: true,
            community_algorithm: CommunityAlgorithm::default(),
        }
    }
}

impl GraphConfig {
    /// Create a builder for fluent configuration
    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::new()
    }

    /// Validate the configuration, returning an error if invalid
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err("similarity_threshold must be within [0, 1]".to_string());
        }
        if !(0.0..1.0).contains(&self.pagerank_damping) {
            return Err("pagerank_damping must be within [0, 1)".to_string());
        }
        if self.pagerank_iterations == 0 {
            return Err("pagerank_iterations must be greater than 0".to_string());
        }
        if self.pagerank_convergence <= 0.0 {
            return Err("pagerank_convergence must be greater than 0".to_string());
        }
        if self.max_nodes == 0 {
            return Err("max_nodes must be greater than 0".to_string());
        }
        Ok(())
    }
}
