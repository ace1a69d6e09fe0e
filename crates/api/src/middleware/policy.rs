//! Policy gate wiring for route handlers.
//!
//! [`ensure_allowed`] consults the pure gate in `carelink_core::policy`
//! with the role and trust level from the token, before any database
//! access. The lifecycle layer re-checks against the user row, so this
//! is a fast-path denial, not the source of truth.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use carelink_core::error::CoreError;
use carelink_core::policy::{can, Action};
use carelink_core::roles::ROLE_ADMIN;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Reject the request when the policy gate denies `action` for `user`.
pub fn ensure_allowed(user: &AuthUser, action: Action) -> Result<(), AppError> {
    let policy_user = user.policy_user()?;
    if !can(&policy_user, action).allowed {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Role '{}' at trust level {} may not perform this action",
            user.role, user.trust_level
        ))));
    }
    Ok(())
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
