//! Data models: store entries and the graph projection derived from them

mod entry;
mod node;

pub use entry::{EntryBuilder, MemoryEntry};
pub use node::{EdgeType, GraphEdge, GraphNode};
