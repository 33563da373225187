//! Event-to-WebSocket fan-out.
//!
//! [`FoundLinksNotifier`] subscribes to the event bus and turns every
//! found-links event into a live `images:links-found` WebSocket message.

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast;

use quizimg_events::FoundLinksEvent;

use crate::ws::WsManager;

/// Message type label on outbound found-links notifications.
pub const LINKS_FOUND_MESSAGE: &str = "images:links-found";

/// Pushes found-links events to live WebSocket clients.
///
/// Each event is delivered twice: once to the connections subscribed to the
/// owning question, and once on the global broadcast so dashboard-style
/// listeners see all activity. A client subscribed to the question therefore
/// receives the message on both paths and deduplicates on its side.
pub struct FoundLinksNotifier {
    ws_manager: Arc<WsManager>,
}

impl FoundLinksNotifier {
    /// Create a new notifier bound to the WebSocket manager.
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the main delivery loop.
    ///
    /// Consumes events from `receiver` until the channel is closed (i.e. the
    /// [`EventBus`](quizimg_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<FoundLinksEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.deliver(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Found-links notifier lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, found-links notifier shutting down");
                    break;
                }
            }
        }
    }

    /// Build the wire message and push it to subscribers plus the global feed.
    async fn deliver(&self, event: &FoundLinksEvent) {
        let msg = serde_json::json!({
            "type": LINKS_FOUND_MESSAGE,
            "questionId": event.question_id,
            "origin": event.origin,
            "count": event.count,
            "links": event.links,
            "timestamp": event.timestamp,
        });
        let ws_msg = Message::Text(msg.to_string().into());

        let delivered = self
            .ws_manager
            .send_to_question(&event.question_id, ws_msg.clone())
            .await;
        self.ws_manager.broadcast(ws_msg).await;

        tracing::debug!(
            question_id = %event.question_id,
            count = event.count,
            delivered,
            "Found-links notification pushed",
        );
    }
}
