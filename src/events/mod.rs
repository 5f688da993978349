//! Event surface for graph state transitions.
//!
//! The graph emits a typed event after each completed bulk operation:
//! building from entries, PageRank computation, and community detection.
//! Subscribers register on the owning [`MemoryGraph`](crate::graph::MemoryGraph)
//! and are invoked synchronously, after the corresponding state transition has
//! been committed. Handler panics are not caught; handlers are expected to be
//! cheap and infallible.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A typed event describing a completed graph operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum GraphEvent {
    /// The graph was (re)built from an entry set
    #[serde(rename = "graph:built")]
    GraphBuilt {
        /// Number of nodes in the graph after the build
        node_count: usize,
    },
    /// A PageRank computation ran to completion
    #[serde(rename = "pagerank:computed")]
    PageRankComputed {
        /// Power iterations executed before convergence or cutoff
        iterations: usize,
    },
    /// Community detection ran to completion
    #[serde(rename = "communities:detected")]
    CommunitiesDetected {
        /// Number of distinct community labels
        community_count: usize,
    },
}

/// Trait for graph event subscribers
///
/// Each method call corresponds to exactly one completed operation; events
/// never fire for operations that did not commit.
pub trait GraphEventHandler: Send + Sync {
    /// Called once per emitted event, after state commit
    fn on_event(&self, event: &GraphEvent);

    /// Get a descriptive name for this handler (optional, for logging)
    fn name(&self) -> &str {
        "anonymous_handler"
    }
}

/// Closure adapter so tests and simple callers can subscribe without a type
struct FnHandler<F: Fn(&GraphEvent) + Send + Sync>(F);

impl<F: Fn(&GraphEvent) + Send + Sync> GraphEventHandler for FnHandler<F> {
    fn on_event(&self, event: &GraphEvent) {
        (self.0)(event)
    }

    fn name(&self) -> &str {
        "fn_handler"
    }
}

/// Subscriber list delivering events in registration order
#[derive(Default, Clone)]
pub(crate) struct EventBus {
    handlers: Vec<Arc<dyn GraphEventHandler>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl EventBus {
    pub(crate) fn subscribe(&mut self, handler: Arc<dyn GraphEventHandler>) {
        debug!(handler = handler.name(), "event handler registered");
        self.handlers.push(handler);
    }

    pub(crate) fn subscribe_fn<F>(&mut self, f: F)
    where
        F: Fn(&GraphEvent) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnHandler(f)));
    }

    pub(crate) fn emit(&self, event: GraphEvent) {
        for handler in &self.handlers {
            handler.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_emit_reaches_all_handlers_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::default();
        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            bus.subscribe_fn(move |event| {
                seen.lock().unwrap().push((tag, *event));
            });
        }

        bus.emit(GraphEvent::GraphBuilt { node_count: 2 });

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("first", GraphEvent::GraphBuilt { node_count: 2 }),
                ("second", GraphEvent::GraphBuilt { node_count: 2 }),
            ]
        );
    }

    #[test]
    fn test_emit_without_handlers_is_noop() {
        let bus = EventBus::default();
        bus.emit(GraphEvent::PageRankComputed { iterations: 0 });
    }

    #[test]
    fn test_event_serde_tagging() {
        let json =
            serde_json::to_string(&GraphEvent::CommunitiesDetected { community_count: 3 }).unwrap();
        assert_eq!(json, r#"{"event":"communities:detected","community_count":3}"#);
    }
}
