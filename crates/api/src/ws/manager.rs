use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};

use quizimg_core::types::Timestamp;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
    /// Question ids this connection has subscribed to.
    pub subscriptions: HashSet<String>,
    /// When this connection was established.
    pub connected_at: Timestamp,
}

/// Manages all active WebSocket connections and their question subscriptions.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    /// Create a new, empty connection manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            sender: tx,
            subscriptions: HashSet::new(),
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection by its ID. Subscriptions go with it.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Subscribe a connection to a question's updates. Subscribing twice is
    /// a no-op.
    pub async fn subscribe(&self, conn_id: &str, question_id: &str) {
        if let Some(conn) = self.connections.write().await.get_mut(conn_id) {
            conn.subscriptions.insert(question_id.to_string());
        }
    }

    /// Drop one of a connection's subscriptions.
    pub async fn unsubscribe(&self, conn_id: &str, question_id: &str) {
        if let Some(conn) = self.connections.write().await.get_mut(conn_id) {
            conn.subscriptions.remove(question_id);
        }
    }

    /// Send a message to every connection subscribed to the question.
    ///
    /// Returns the number of connections the message was sent to.
    pub async fn send_to_question(&self, question_id: &str, message: Message) -> usize {
        let conns = self.connections.read().await;
        let mut count = 0;
        for conn in conns.values() {
            if conn.subscriptions.contains(question_id) {
                let _ = conn.sender.send(message.clone());
                count += 1;
            }
        }
        count
    }

    /// Broadcast a message to all connected clients.
    ///
    /// Connections whose send channels are closed are silently skipped
    /// (they will be cleaned up on their next receive loop iteration).
    pub async fn broadcast(&self, message: Message) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(message.clone());
        }
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// How many connections are subscribed to the given question.
    pub async fn subscriber_count(&self, question_id: &str) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|c| c.subscriptions.contains(question_id))
            .count()
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops accepting new connections.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    ///
    /// Used by the keepalive loop to keep connections alive and detect
    /// stale ones.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }

    /// Spawn the keepalive loop: one Ping frame to every client each tick.
    ///
    /// Ticks with no connections are skipped. The loop runs until the
    /// returned handle is aborted, which shutdown does after draining the
    /// connection map.
    pub fn spawn_keepalive(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let clients = self.connection_count().await;
                if clients > 0 {
                    tracing::debug!(clients, "Pinging WebSocket clients");
                    self.ping_all().await;
                }
            }
        })
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
