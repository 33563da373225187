//! Shared-secret gate for inbound worker calls.
//!
//! The trust boundary is the secret itself: a matching bearer credential is
//! the only authorization the ingest surface performs. The check runs before
//! any handler logic.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::server::IngestState;

/// Reject calls whose `authorization` header does not carry the configured
/// secret. Both `Bearer <secret>` and the bare secret are accepted, matching
/// what the workers send. With no secret configured the gate is open (local
/// development only).
pub async fn require_shared_secret(
    State(state): State<IngestState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(secret) = state.secret.as_deref() {
        let presented = request
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let ok = presented == format!("Bearer {secret}") || presented == secret;
        if !ok {
            tracing::warn!("ingest call rejected: invalid shared secret");
            return (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({
                    "error": "invalid api key",
                    "code": "UNAUTHENTICATED",
                })),
            )
                .into_response();
        }
    }

    next.run(request).await
}
