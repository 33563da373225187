use quizimg_core::error::CoreError;

/// Errors from the worker RPC boundary.
///
/// Raw transport failures and worker status codes are translated into this
/// closed set inside [`WorkerClient`](crate::client::WorkerClient); callers
/// never match on HTTP statuses.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The worker rejected the payload as structurally invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced job or resource is unknown to the worker.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The job has not reached a terminal state yet.
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    /// The client was never initialized or the worker is unreachable.
    #[error("Worker unavailable: {0}")]
    Unavailable(String),

    /// Anything else, including malformed worker responses.
    #[error("Worker error: {0}")]
    Internal(String),
}

impl From<WorkerError> for CoreError {
    fn from(err: WorkerError) -> Self {
        match err {
            WorkerError::InvalidArgument(msg) => CoreError::Validation(msg),
            WorkerError::NotFound(msg) => CoreError::not_found("Job", msg),
            WorkerError::FailedPrecondition(msg) => CoreError::PreconditionFailed(msg),
            WorkerError::Unavailable(msg) => CoreError::Unavailable(msg),
            WorkerError::Internal(msg) => CoreError::Internal(msg),
        }
    }
}
