//! Bearer-token gate for the control-plane routes.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::state::AppState;

/// Reject calls whose `Authorization` header does not carry the configured
/// API token as `Bearer <token>`. With no token configured the gate is open
/// (local development only).
///
/// The WebSocket upgrade and the image serving routes are mounted outside
/// this gate: browsers cannot attach an Authorization header to either.
pub async fn require_api_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(token) = state.config.api_token.as_deref() {
        let presented = request
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if presented != format!("Bearer {token}") {
            return (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({
                    "error": "Missing or invalid API token",
                    "code": "UNAUTHORIZED",
                })),
            )
                .into_response();
        }
    }

    next.run(request).await
}
