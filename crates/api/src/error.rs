use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use quizimg_core::error::CoreError;
use quizimg_workers::WorkerError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`WorkerError`] for outbound
/// worker failures. Implements [`IntoResponse`] to produce consistent JSON
/// error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `quizimg_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A translated failure from one of the worker clients.
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => classify_core_error(core),

            // --- Worker failures ---
            AppError::Worker(worker) => match worker {
                WorkerError::InvalidArgument(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                WorkerError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
                WorkerError::FailedPrecondition(msg) => (
                    StatusCode::BAD_REQUEST,
                    "FAILED_PRECONDITION",
                    msg.clone(),
                ),
                WorkerError::Unavailable(msg) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", msg.clone())
                }
                WorkerError::Internal(msg) => {
                    tracing::error!(error = %msg, "Worker internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a domain error into an HTTP status, error code, and message.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::PreconditionFailed(msg) => (
            StatusCode::BAD_REQUEST,
            "FAILED_PRECONDITION",
            msg.clone(),
        ),
        CoreError::Unavailable(msg) => {
            (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", msg.clone())
        }
        CoreError::Unauthenticated(msg) => {
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
