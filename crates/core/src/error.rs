/// Closed error taxonomy for the whole coordinator.
///
/// Transport failures and worker-side codes are translated into these
/// variants at the boundary that produced them; nothing past that boundary
/// inspects raw status codes.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed input, rejected before any I/O.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity, job, or variant pair absent.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// A job has not reached a terminal state yet. Surfaced as a client
    /// error, never as a server fault.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// An outbound client was never initialized or a worker is unreachable.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Bad or missing shared-secret credential on an inbound call.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Unexpected failure, including storage faults not otherwise classified.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a `NotFound` with a string-ish id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}
