//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use carelink_core::error::CoreError;
use carelink_core::policy::{PolicyUser, Role};
use carelink_core::trust::TrustLevel;
use carelink_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name (`"hirer"`, `"caregiver"`, `"admin"`).
    pub role: String,
    /// The user's trust level at token issue time.
    pub trust_level: TrustLevel,
}

impl AuthUser {
    /// Build the policy gate view of this user.
    pub fn policy_user(&self) -> Result<PolicyUser, AppError> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Unknown role '{}' in token",
                self.role
            )))
        })?;
        Ok(PolicyUser {
            role,
            trust_level: self.trust_level,
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let trust_level = TrustLevel::parse(&claims.trust_level).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Unknown trust level '{}' in token",
                claims.trust_level
            )))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            trust_level,
        })
    }
}
