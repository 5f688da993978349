//! Memory entry model as observed from the backing store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_category() -> String {
    "general".to_string()
}

fn default_confidence() -> f32 {
    0.5
}

/// One record in the backing store: content plus metadata plus references
/// plus an optional embedding.
///
/// The graph core treats entries as external input. It reads the identity,
/// category, confidence, access and timestamp fields when projecting a node,
/// and the reference list and embedding when building edges; everything else
/// is carried opaquely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryEntry {
    /// Unique identifier for the entry
    pub id: String,

    /// The actual content of the entry
    pub content: String,

    /// Category tag for grouping entries
    #[serde(default = "default_category")]
    pub category: String,

    /// Confidence in the entry's content, in [0, 1]
    #[serde(default = "default_confidence")]
    pub confidence: f32,

    /// How many times the entry has been accessed
    #[serde(default)]
    pub access_count: u32,

    /// When the entry was created
    pub created_at: DateTime<Utc>,

    /// When the entry was last accessed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,

    /// Namespace the entry lives in, if the store partitions entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Identifiers of entries this one references
    #[serde(default)]
    pub references: Vec<String>,

    /// Dense embedding vector if available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    /// Additional properties as arbitrary JSON
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl MemoryEntry {
    /// Create a new entry with minimal information
    pub fn new(id: String, content: String) -> Self {
        Self {
            id,
            content,
            category: default_category(),
            confidence: default_confidence(),
            access_count: 0,
            created_at: Utc::now(),
            last_accessed: None,
            namespace: None,
            references: Vec::new(),
            embedding: None,
            metadata: serde_json::json!({}),
        }
    }

    /// Create a builder for more complex entry construction
    pub fn builder(id: String, content: String) -> EntryBuilder {
        EntryBuilder {
            entry: Self::new(id, content),
        }
    }

    /// Check if this entry has an embedding
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}

/// Builder for creating [`MemoryEntry`] instances
pub struct EntryBuilder {
    entry: MemoryEntry,
}

impl EntryBuilder {
    /// Create a new entry builder with an auto-generated UUID
    pub fn new_with_content<S: Into<String>>(content: S) -> Self {
        Self {
            entry: MemoryEntry::new(Uuid::new_v4().to_string(), content.into()),
        }
    }

    /// Override the entry identifier
    pub fn id<S: Into<String>>(mut self, id: S) -> Self {
        self.entry.id = id.into();
        self
    }

    /// Set the category tag
    pub fn category<S: Into<String>>(mut self, category: S) -> Self {
        self.entry.category = category.into();
        self
    }

    /// Set the confidence scalar
    pub fn confidence(mut self, confidence: f32) -> Self {
        self.entry.confidence = confidence;
        self
    }

    /// Set the access counter
    pub fn access_count(mut self, access_count: u32) -> Self {
        self.entry.access_count = access_count;
        self
    }

    /// Set the creation timestamp
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.entry.created_at = created_at;
        self
    }

    /// Set the namespace
    pub fn namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.entry.namespace = Some(namespace.into());
        self
    }

    /// Add a single outgoing reference (convenience method)
    pub fn reference<S: Into<String>>(mut self, target: S) -> Self {
        self.entry.references.push(target.into());
        self
    }

    /// Set the full reference list
    pub fn references(mut self, references: Vec<String>) -> Self {
        self.entry.references = references;
        self
    }

    /// Set the embedding vector
    pub fn embedding(mut self, embedding: Vec<f32>) -> Self {
        self.entry.embedding = Some(embedding);
        self
    }

    /// Set a single metadata property (convenience method)
    pub fn property(mut self, key: &str, value: serde_json::Value) -> Self {
        if let serde_json::Value::Object(ref mut map) = self.entry.metadata {
            map.insert(key.to_string(), value);
        } else {
            let mut map = serde_json::Map::new();
            map.insert(key.to_string(), value);
            self.entry.metadata = serde_json::Value::Object(map);
        }
        self
    }

    /// Build the final entry
    pub fn build(self) -> MemoryEntry {
        self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_defaults() {
        let entry = MemoryEntry::new("e1".to_string(), "content".to_string());
        assert_eq!(entry.category, "general");
        assert_eq!(entry.confidence, 0.5);
        assert_eq!(entry.access_count, 0);
        assert!(entry.references.is_empty());
        assert!(!entry.has_embedding());
    }

    #[test]
    fn test_builder_generates_id() {
        let entry = EntryBuilder::new_with_content("hello").build();
        assert!(!entry.id.is_empty());
        assert_eq!(entry.content, "hello");
    }

    #[test]
    fn test_builder_sets_fields() {
        let entry = EntryBuilder::new_with_content("x")
            .id("custom")
            .category("decision")
            .confidence(0.9)
            .reference("other")
            .embedding(vec![0.1, 0.2])
            .build();
        assert_eq!(entry.id, "custom");
        assert_eq!(entry.category, "decision");
        assert_eq!(entry.confidence, 0.9);
        assert_eq!(entry.references, vec!["other".to_string()]);
        assert!(entry.has_embedding());
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let json = r#"{"id":"e1","content":"c","created_at":"2024-01-01T00:00:00Z"}"#;
        let entry: MemoryEntry = serde_json::from_str(json).expect("deserialize");
        assert_eq!(entry.category, "general");
        assert_eq!(entry.confidence, 0.5);
        assert!(entry.embedding.is_none());
    }
}
