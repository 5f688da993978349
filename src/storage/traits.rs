//! Trait definition for the external backing store

use crate::models::MemoryEntry;
use crate::storage::errors::StoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Parameters for bulk entry queries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryParams {
    /// Restrict results to a namespace, if the store partitions entries
    pub namespace: Option<String>,

    /// Maximum number of entries to return
    pub limit: Option<usize>,
}

impl QueryParams {
    /// Query up to `limit` entries across all namespaces
    pub fn with_limit(limit: usize) -> Self {
        Self {
            namespace: None,
            limit: Some(limit),
        }
    }
}

/// Parameters for vector similarity search
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchParams {
    /// Maximum number of neighbours to return
    pub k: usize,

    /// Minimum similarity score (0.0 to 1.0) for a hit to be returned
    pub threshold: f32,
}

/// A single result from a similarity search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// The entry that matched
    pub entry: MemoryEntry,

    /// Cosine-like similarity score in [0, 1]; higher is more similar
    pub score: f32,
}

/// Capability the graph core requires from the external memory system.
///
/// Three read-only operations: point lookup, bulk query, and embedding
/// search. Implementations own all persistence concerns; the graph core
/// never writes back through this interface.
#[async_trait]
pub trait BackingStore: Send + Sync + Debug {
    /// Get an entry by its ID, or `None` if absent
    async fn get(&self, id: &str) -> StoreResult<Option<MemoryEntry>>;

    /// List entries matching the query parameters
    async fn query(&self, params: QueryParams) -> StoreResult<Vec<MemoryEntry>>;

    /// Find the entries most similar to the given embedding
    ///
    /// Returns up to `params.k` hits scoring at or above `params.threshold`,
    /// ordered by descending similarity.
    async fn search(&self, embedding: &[f32], params: SearchParams) -> StoreResult<Vec<SearchHit>>;
}
