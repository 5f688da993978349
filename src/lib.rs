//! # Memograph
//!
//! Knowledge-graph ranking and clustering core for vector-embedded memory
//! stores. Memory entries, which are content chunks carrying metadata,
//! cross-references, and optional embeddings, are projected into a directed
//! multi-type graph, scored with PageRank, partitioned into communities,
//! and blended with similarity-search scores to re-rank retrieval results.
//!
//! The backing store that owns the entries stays external: it is abstracted
//! behind the [`storage::BackingStore`] capability and is never written to.
//! The graph itself is an in-memory projection, rebuilt on demand.
//!
//! ## Quick Start
//!
//! ```rust
//! use memograph::prelude::*;
//!
//! let a = EntryBuilder::new_with_content("Rayleigh scattering")
//!     .id("sky")
//!     .build();
//! let b = EntryBuilder::new_with_content("The sky is blue")
//!     .id("blue")
//!     .reference("sky")
//!     .build();
//!
//! let mut graph = MemoryGraph::new();
//! graph.build_from_entries(&[a, b]);
//!
//! let ranks = graph.compute_page_rank();
//! assert_eq!(ranks.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! - **Graph store**: nodes, ordered out-edges, reverse-edge index
//! - **Edge builder**: reference ingest plus similarity enrichment from the
//!   backing store's vector search
//! - **PageRank engine**: power iteration with dangling-mass redistribution
//! - **Community detector**: weighted asynchronous label propagation
//! - **Ranker**: blends similarity scores with structural importance
//!
//! All pure-graph operations are synchronous and total; only the paths that
//! talk to the backing store are `async` and fallible.

pub mod config;
pub mod events;
pub mod graph;
pub mod models;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::config::{CommunityAlgorithm, GraphConfig, GraphConfigBuilder};
    pub use crate::events::{GraphEvent, GraphEventHandler};
    pub use crate::graph::{GraphStats, MemoryGraph, RankedResult, TopNode, DEFAULT_BLEND_ALPHA};
    pub use crate::models::{EdgeType, EntryBuilder, GraphEdge, GraphNode, MemoryEntry};
    pub use crate::storage::{
        BackingStore, InMemoryStore, QueryParams, SearchHit, SearchParams, StoreError,
    };
    pub use crate::{MemographError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for memograph operations
///
/// Pure-graph operations are total and never fail; the only fallible paths
/// are configuration validation and the async edge-builder operations that
/// talk to the backing store.
#[derive(Debug, thiserror::Error)]
pub enum MemographError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error raised by the backing store and propagated unchanged
    #[error("Store error: {0}")]
    Store(#[from] crate::storage::StoreError),
}

/// Result type for memograph operations
pub type Result<T> = std::result::Result<T, MemographError>;
