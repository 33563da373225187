use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Inbound client messages. Anything that does not parse is ignored.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ClientMessage {
    #[serde(rename = "subscribe:question")]
    Subscribe {
        #[serde(rename = "questionId")]
        question_id: String,
    },
    #[serde(rename = "unsubscribe:question")]
    Unsubscribe {
        #[serde(rename = "questionId")]
        question_id: String,
    },
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with `WsManager` and
/// managed by two spawned tasks (sender + receiver).
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager`.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Processes inbound subscribe/unsubscribe messages on the current task.
///   4. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    // Register and get the receiver for outbound messages.
    let mut rx = ws_manager.add(conn_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                dispatch_client_message(&ws_manager, &conn_id, &text).await;
            }
            Ok(_msg) => {
                // Binary and Ping frames carry nothing for us.
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection and abort sender task.
    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Apply one parsed client message. Malformed payloads are logged at debug
/// level and dropped; the connection stays up.
async fn dispatch_client_message(ws_manager: &WsManager, conn_id: &str, text: &str) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Subscribe { question_id }) => {
            tracing::debug!(conn_id = %conn_id, question_id = %question_id, "Subscribed");
            ws_manager.subscribe(conn_id, &question_id).await;
        }
        Ok(ClientMessage::Unsubscribe { question_id }) => {
            tracing::debug!(conn_id = %conn_id, question_id = %question_id, "Unsubscribed");
            ws_manager.unsubscribe(conn_id, &question_id).await;
        }
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Ignoring unparseable message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_message_parses() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"subscribe:question","questionId":"q1"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Subscribe { question_id } if question_id == "q1"));
    }

    #[test]
    fn unknown_type_is_an_error() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"nope"}"#).is_err());
    }
}
