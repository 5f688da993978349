//! In-memory backing store implementation

use crate::models::MemoryEntry;
use crate::storage::errors::StoreResult;
use crate::storage::traits::{BackingStore, QueryParams, SearchHit, SearchParams};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Calculate cosine similarity between two vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// A self-contained [`BackingStore`] holding entries in a `HashMap`.
///
/// Search is a brute-force cosine scan over every embedded entry, which is
/// plenty for test suites and small embedded deployments. Entries are
/// inserted directly; the graph core itself never writes here.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries
    pub async fn with_entries(entries: Vec<MemoryEntry>) -> Self {
        let store = Self::new();
        for entry in entries {
            store.insert(entry).await;
        }
        store
    }

    /// Insert or replace an entry
    pub async fn insert(&self, entry: MemoryEntry) {
        self.entries.write().await.insert(entry.id.clone(), entry);
    }

    /// Remove an entry by ID, returning it if present
    pub async fn remove(&self, id: &str) -> Option<MemoryEntry> {
        self.entries.write().await.remove(id)
    }

    /// Number of entries currently stored
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl BackingStore for InMemoryStore {
    async fn get(&self, id: &str) -> StoreResult<Option<MemoryEntry>> {
        Ok(self.entries.read().await.get(id).cloned())
    }

    async fn query(&self, params: QueryParams) -> StoreResult<Vec<MemoryEntry>> {
        let entries = self.entries.read().await;
        let mut matched: Vec<MemoryEntry> = entries
            .values()
            .filter(|entry| match &params.namespace {
                Some(ns) => entry.namespace.as_deref() == Some(ns.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        // Deterministic output for an unordered map
        matched.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(limit) = params.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn search(&self, embedding: &[f32], params: SearchParams) -> StoreResult<Vec<SearchHit>> {
        let entries = self.entries.read().await;
        let mut hits: Vec<SearchHit> = entries
            .values()
            .filter_map(|entry| {
                let candidate = entry.embedding.as_deref()?;
                let score = cosine_similarity(embedding, candidate);
                (score >= params.threshold).then(|| SearchHit {
                    entry: entry.clone(),
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.entry.id.cmp(&b.entry.id))
        });
        hits.truncate(params.k);

        debug!(k = params.k, hits = hits.len(), "vector search completed");
        Ok(hits)
    }
}
