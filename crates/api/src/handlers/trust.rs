//! Admin handlers for trust recomputation.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use carelink_core::types::DbId;
use carelink_db::models::trust::reason_codes;
use carelink_db::repositories::TrustHistoryRepo;
use carelink_events::{event_types, LifecycleEvent};
use carelink_lifecycle::trust_worker;

use crate::error::AppResult;
use crate::middleware::policy::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/trust/run
///
/// Trigger a full trust sweep over all active caregivers. Returns the
/// batch summary. Admin only.
pub async fn run_sweep(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    tracing::info!(admin_id = auth.user_id, "Manual trust sweep triggered");

    let summary =
        trust_worker::run_trust_level_worker(&state.pool, reason_codes::MANUAL_TRIGGER).await?;

    Ok(Json(DataResponse::new(summary)))
}

/// POST /api/v1/admin/trust/users/{id}
///
/// Recompute one user's trust score and level. Admin only.
pub async fn update_user(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let update =
        trust_worker::update_user_trust(&state.pool, user_id, reason_codes::MANUAL_TRIGGER)
            .await?;

    if update.level_changed() {
        state.event_bus.publish(
            LifecycleEvent::new(event_types::TRUST_LEVEL_CHANGED)
                .with_source("user", user_id)
                .with_actor(auth.user_id)
                .with_payload(serde_json::json!({
                    "previous_level": update.previous_level,
                    "new_level": update.new_level,
                    "new_score": update.new_score,
                })),
        );
    }

    Ok(Json(DataResponse::new(update)))
}

/// GET /api/v1/admin/trust/users/{id}/history
///
/// A user's trust score history, newest first. Admin only.
pub async fn user_history(
    RequireAdmin(_auth): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let history = TrustHistoryRepo::list_for_user(&state.pool, user_id).await?;
    Ok(Json(DataResponse::new(history)))
}
