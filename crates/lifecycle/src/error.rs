use carelink_core::error::CoreError;

/// Error type for lifecycle operations.
///
/// Wraps the domain taxonomy and raw database failures separately so
/// the API layer can map domain errors to precise status codes while
/// database errors stay sanitized 500s.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// A domain-level error from `carelink_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience alias for lifecycle results.
pub type LifecycleResult<T> = Result<T, LifecycleError>;
