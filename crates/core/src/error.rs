use crate::job_state::JobStatus;
use crate::types::DbId;

/// Domain-level error taxonomy shared by every layer above `core`.
///
/// The API layer maps each variant to an HTTP status and a stable error
/// code; see `carelink-api`'s `error` module. Variants carry only the
/// data a client needs for diagnostics — never SQL or internal detail.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed a domain validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request conflicts with current state (lost race, schedule
    /// overlap, duplicate).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not permitted (ownership, role, or trust level).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Attempted job status transition not present in the transition table.
    #[error("Invalid transition from '{from}' to '{to}' for job {job_id}")]
    InvalidTransition {
        from: JobStatus,
        to: JobStatus,
        job_id: DbId,
    },

    /// A wallet balance is too low for the requested movement. Always
    /// raised before any partial write, inside the owning transaction.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Anything that should never happen in a healthy deployment.
    #[error("Internal error: {0}")]
    Internal(String),
}
