//! Handlers for the caller's wallet and ledger.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use carelink_core::error::CoreError;
use carelink_core::roles::{ROLE_CAREGIVER, ROLE_HIRER};
use carelink_db::models::ledger::LedgerListQuery;
use carelink_db::models::wallet::{wallet_types, Wallet};
use carelink_db::repositories::{LedgerRepo, WalletRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// The caller's own wallet. Admins have no personal wallet.
async fn find_own_wallet(pool: &sqlx::PgPool, auth: &AuthUser) -> AppResult<Wallet> {
    let wallet_type = match auth.role.as_str() {
        ROLE_HIRER => wallet_types::HIRER,
        ROLE_CAREGIVER => wallet_types::CAREGIVER,
        other => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Role '{other}' has no wallet"
            ))))
        }
    };
    WalletRepo::find_for_user(pool, auth.user_id, wallet_type)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Wallet",
            id: auth.user_id,
        }))
}

/// GET /api/v1/wallet
///
/// The caller's wallet balances.
pub async fn get_wallet(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let wallet = find_own_wallet(&state.pool, &auth).await?;
    Ok(Json(DataResponse::new(wallet)))
}

/// GET /api/v1/wallet/ledger
///
/// The caller's ledger entries, newest first. Supports `limit` and
/// `offset` query parameters.
pub async fn get_ledger(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LedgerListQuery>,
) -> AppResult<impl IntoResponse> {
    let wallet = find_own_wallet(&state.pool, &auth).await?;
    let entries = LedgerRepo::list_for_wallet(&state.pool, wallet.id, &params).await?;
    Ok(Json(DataResponse::new(entries)))
}
