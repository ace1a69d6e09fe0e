use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use carelink_core::error::CoreError;
use carelink_lifecycle::LifecycleError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce the
/// `{ "success": false, "error": ... }` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `carelink_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Core(core) => AppError::Core(core),
            LifecycleError::Database(db) => AppError::Database(db),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    json!({
                        "code": "NOT_FOUND",
                        "message": format!("{entity} with id {id} not found"),
                    }),
                ),
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    json!({ "code": "VALIDATION_ERROR", "message": msg }),
                ),
                CoreError::InvalidTransition { from, to, job_id } => (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "code": "INVALID_TRANSITION",
                        "message": format!(
                            "Job {job_id} cannot move from '{from}' to '{to}'"
                        ),
                        "from_state": from.as_str(),
                        "to_state": to.as_str(),
                        "job_id": job_id,
                    }),
                ),
                CoreError::Conflict(msg) => (
                    StatusCode::CONFLICT,
                    json!({ "code": "CONFLICT", "message": msg }),
                ),
                CoreError::InsufficientFunds(msg) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({ "code": "INSUFFICIENT_FUNDS", "message": msg }),
                ),
                CoreError::Unauthorized(msg) => (
                    StatusCode::UNAUTHORIZED,
                    json!({ "code": "UNAUTHORIZED", "message": msg }),
                ),
                CoreError::Forbidden(msg) => (
                    StatusCode::FORBIDDEN,
                    json!({ "code": "FORBIDDEN", "message": msg }),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({
                            "code": "INTERNAL_ERROR",
                            "message": "An internal error occurred",
                        }),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "code": "BAD_REQUEST", "message": msg }),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "code": "INTERNAL_ERROR",
                        "message": "An internal error occurred",
                    }),
                )
            }
        };

        let body = json!({
            "success": false,
            "error": error,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status and error object.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`)
///   map to 409; an escrow double-create surfaces here.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, serde_json::Value) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            json!({ "code": "NOT_FOUND", "message": "Resource not found" }),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        json!({
                            "code": "CONFLICT",
                            "message": format!(
                                "Duplicate value violates unique constraint: {constraint}"
                            ),
                        }),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "code": "INTERNAL_ERROR",
                    "message": "An internal error occurred",
                }),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "code": "INTERNAL_ERROR",
                    "message": "An internal error occurred",
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use carelink_core::job_state::JobStatus;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("valid JSON body")
    }

    #[tokio::test]
    async fn invalid_transition_maps_to_400_with_context() {
        let err = AppError::Core(CoreError::InvalidTransition {
            from: JobStatus::Draft,
            to: JobStatus::Completed,
            job_id: 9,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
        assert_eq!(body["error"]["from_state"], "draft");
        assert_eq!(body["error"]["to_state"], "completed");
        assert_eq!(body["error"]["job_id"], 9);
    }

    #[tokio::test]
    async fn insufficient_funds_maps_to_422() {
        let err = AppError::Core(CoreError::InsufficientFunds(
            "Insufficient wallet balance to publish job".into(),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INSUFFICIENT_FUNDS");
    }

    #[tokio::test]
    async fn conflict_maps_to_409() {
        let err = AppError::Core(CoreError::Conflict("overlap".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn internal_errors_are_sanitized() {
        let err = AppError::InternalError("secret detail".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }
}
