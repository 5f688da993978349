//! Error types for backing-store operations

/// Error type for backing-store operations.
///
/// Store failures are propagated unchanged through the async edge-builder
/// paths; the graph never absorbs or retries them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error
    #[error("Query error: {0}")]
    Query(String),

    /// Operation error
    #[error("Operation error: {0}")]
    Operation(String),

    /// Data not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Result type for backing-store operations
pub type StoreResult<T> = Result<T, StoreError>;
