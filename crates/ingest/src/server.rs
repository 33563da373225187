//! Ingest router and listener.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use quizimg_db::{SharedImagePairStore, SharedQuestionStore};
use quizimg_events::EventBus;

use crate::auth::require_shared_secret;
use crate::handlers;

/// Inbound payloads carry full-resolution image bytes; the default 2 MiB
/// body cap is far too small.
pub const MAX_INBOUND_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Shared state for the ingest surface.
#[derive(Clone)]
pub struct IngestState {
    pub questions: SharedQuestionStore,
    pub pairs: SharedImagePairStore,
    pub bus: Arc<EventBus>,
    /// Shared-secret bearer credential expected on every inbound call.
    pub secret: Option<String>,
}

/// Build the ingest router: both delivery endpoints behind the shared-secret
/// gate, with the elevated body limit.
pub fn router(state: IngestState) -> Router {
    Router::new()
        .route("/ingest/found-links", post(handlers::accept_found_links))
        .route(
            "/ingest/compressed-image",
            post(handlers::accept_compressed_image),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_shared_secret,
        ))
        .layer(DefaultBodyLimit::max(MAX_INBOUND_BODY_BYTES))
        .with_state(state)
}

/// Bind and serve the ingest endpoint until the process exits.
pub async fn serve(addr: &str, state: IngestState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Ingest server listening");
    axum::serve(listener, router(state)).await
}
