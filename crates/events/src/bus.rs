//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Shared via `Arc<EventBus>` between the ingest server (publisher) and the
//! realtime notifier (subscriber).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use quizimg_core::question::{FoundLink, DEFAULT_LINK_ORIGIN};

/// A found-links delivery, as republished to live subscribers.
///
/// `count` reflects the full delivered set, independent of how many links
/// were actually new after URL dedup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundLinksEvent {
    pub question_id: String,
    pub origin: String,
    pub count: usize,
    pub links: Vec<FoundLink>,
    pub timestamp: DateTime<Utc>,
}

impl FoundLinksEvent {
    /// Build an event for a delivery, defaulting the origin label.
    pub fn new(question_id: impl Into<String>, links: Vec<FoundLink>, origin: Option<String>) -> Self {
        Self {
            question_id: question_id.into(),
            origin: origin.unwrap_or_else(|| DEFAULT_LINK_ORIGIN.to_string()),
            count: links.len(),
            links,
            timestamp: Utc::now(),
        }
    }
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// Fire-and-forget fan-out hub.
///
/// `publish` returns immediately with no delivery guarantee; when the buffer
/// fills, the oldest unconsumed events are dropped and slow receivers see
/// `RecvError::Lagged`.
pub struct EventBus {
    sender: broadcast::Sender<FoundLinksEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Zero subscribers is not an error;
    /// the event is silently dropped.
    pub fn publish(&self, event: FoundLinksEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to every event published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<FoundLinksEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
