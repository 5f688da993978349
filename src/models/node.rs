//! Graph projection types: nodes and typed weighted edges

use crate::models::MemoryEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relationship types between graph nodes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeType {
    /// Derived from an entry's declared cross-references
    Reference,
    /// Added from a vector-search neighbourhood, weighted by similarity
    Similar,
    /// Entries adjacent in time
    Temporal,
    /// Entries retrieved together
    CoAccessed,
    /// One entry caused or produced another
    Causal,
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Similar => write!(f, "similar"),
            Self::Temporal => write!(f, "temporal"),
            Self::CoAccessed => write!(f, "co-accessed"),
            Self::Causal => write!(f, "causal"),
        }
    }
}

/// A node in the memory graph, projected from a [`MemoryEntry`] at ingest.
///
/// Nodes are immutable once inserted; re-adding an entry replaces the node
/// wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    /// Entry identifier this node mirrors
    pub id: String,

    /// Category tag, `"general"` when the entry carries none
    pub category: String,

    /// Confidence scalar clamped to [0, 1]
    pub confidence: f32,

    /// Access counter at projection time
    pub access_count: u32,

    /// When the underlying entry was created
    pub created_at: DateTime<Utc>,
}

impl From<&MemoryEntry> for GraphNode {
    fn from(entry: &MemoryEntry) -> Self {
        let category = if entry.category.is_empty() {
            "general".to_string()
        } else {
            entry.category.clone()
        };
        Self {
            id: entry.id.clone(),
            category,
            confidence: entry.confidence.clamp(0.0, 1.0),
            access_count: entry.access_count,
            created_at: entry.created_at,
        }
    }
}

/// A directed edge stored under its source node.
///
/// At most one edge exists per ordered `(source, target)` pair. Re-adding the
/// pair keeps the maximum weight and the original type: edges are classified
/// once at creation and later observations only reinforce weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    /// Target node identifier
    pub target: String,

    /// Type of relationship
    pub edge_type: EdgeType,

    /// Positive edge weight
    pub weight: f64,
}

impl GraphEdge {
    pub fn new(target: impl Into<String>, edge_type: EdgeType, weight: f64) -> Self {
        Self {
            target: target.into(),
            edge_type,
            weight,
        }
    }
}
