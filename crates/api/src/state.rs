use std::sync::Arc;

use quizimg_db::{SharedImagePairStore, SharedQuestionStore};
use quizimg_events::EventBus;
use quizimg_workers::WorkerClient;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Question documents.
    pub questions: SharedQuestionStore,
    /// Image variant pairs.
    pub pairs: SharedImagePairStore,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Outbound client for the link-finder worker.
    pub link_finder: Arc<WorkerClient>,
    /// Outbound client for the compressor worker.
    pub compressor: Arc<WorkerClient>,
    /// Fan-out hub for found-links events.
    pub event_bus: Arc<EventBus>,
}
