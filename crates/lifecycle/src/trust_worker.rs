//! Trust score recomputation.
//!
//! [`update_user_trust`] recomputes one user's score and level from
//! behavioral signals; [`run_trust_level_worker`] sweeps every active
//! caregiver. Signal gathering happens outside any transaction (the view
//! is eventually correct); the write side is one transaction per user
//! with a conditional update, so an identical concurrent recomputation
//! is a clean no-op with no history row.

use serde::Serialize;
use sqlx::PgPool;

use carelink_core::audit::action_types;
use carelink_core::error::CoreError;
use carelink_core::trust::{calculate_trust_score, determine_trust_level, TrustBreakdown, TrustLevel};
use carelink_core::types::DbId;
use carelink_db::models::audit::NewAuditEvent;
use carelink_db::models::trust::NewTrustHistory;
use carelink_db::repositories::{AuditRepo, TrustHistoryRepo, TrustSignalRepo, UserRepo};

use crate::error::LifecycleResult;

/// Result of recomputing one user's trust.
#[derive(Debug, Clone, Serialize)]
pub struct TrustUpdate {
    pub user_id: DbId,
    pub previous_score: i32,
    pub new_score: i32,
    pub previous_level: TrustLevel,
    pub new_level: TrustLevel,
    /// `false` when score and level both matched the stored values and
    /// nothing was written.
    pub changed: bool,
    pub breakdown: TrustBreakdown,
}

impl TrustUpdate {
    pub fn level_changed(&self) -> bool {
        self.previous_level != self.new_level
    }
}

/// One batch run over all active caregivers.
#[derive(Debug, Clone, Serialize)]
pub struct TrustWorkerSummary {
    pub total: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub errors: usize,
    /// Per-user outcomes, in sweep order.
    pub details: Vec<SweepEntry>,
}

/// Outcome of one user within a sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepEntry {
    pub user_id: DbId,
    pub outcome: SweepOutcome,
    /// Present only when `outcome` is `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepOutcome {
    Updated,
    Unchanged,
    Error,
}

/// Recompute one user's trust score and level and persist the result.
///
/// Writes the user row, a history entry, and an audit event in one
/// transaction — or nothing at all when the recomputation lands on the
/// stored values.
pub async fn update_user_trust(
    pool: &PgPool,
    user_id: DbId,
    reason_code: &str,
) -> LifecycleResult<TrustUpdate> {
    let user = UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;
    let previous_level = user.parsed_trust_level()?;

    let signals = TrustSignalRepo::gather(pool, &user).await?;
    let breakdown = calculate_trust_score(&signals);
    let new_level = determine_trust_level(previous_level, breakdown.total, &user.verification());

    let update = TrustUpdate {
        user_id,
        previous_score: user.trust_score,
        new_score: breakdown.total,
        previous_level,
        new_level,
        changed: breakdown.total != user.trust_score || new_level != previous_level,
        breakdown,
    };
    if !update.changed {
        return Ok(update);
    }

    let breakdown_json = serde_json::to_value(breakdown)
        .map_err(|e| CoreError::Internal(format!("Breakdown serialization failed: {e}")))?;

    let mut tx = pool.begin().await?;
    let wrote = UserRepo::update_trust(
        tx.as_mut(),
        user_id,
        breakdown.total,
        new_level.as_str(),
    )
    .await?;
    if !wrote {
        // A concurrent recomputation landed the same values first.
        tx.rollback().await?;
        return Ok(TrustUpdate {
            changed: false,
            ..update
        });
    }
    TrustHistoryRepo::append(
        tx.as_mut(),
        &NewTrustHistory {
            user_id,
            previous_score: user.trust_score,
            new_score: breakdown.total,
            previous_level: previous_level.as_str(),
            new_level: new_level.as_str(),
            reason_code,
            breakdown: breakdown_json.clone(),
        },
    )
    .await?;
    AuditRepo::insert(
        tx.as_mut(),
        &NewAuditEvent {
            actor_user_id: None,
            action_type: action_types::TRUST_UPDATE,
            entity_type: "user",
            entity_id: user_id,
            details: serde_json::json!({
                "previous_score": user.trust_score,
                "new_score": breakdown.total,
                "previous_level": previous_level.as_str(),
                "new_level": new_level.as_str(),
                "reason_code": reason_code,
                "breakdown": breakdown_json,
            }),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::debug!(
        user_id,
        previous_score = user.trust_score,
        new_score = breakdown.total,
        previous_level = %previous_level,
        new_level = %new_level,
        reason_code,
        "Trust recomputed",
    );

    Ok(update)
}

/// Recompute trust for every active caregiver, sequentially.
///
/// A failure for one user is logged and counted; the sweep never aborts.
pub async fn run_trust_level_worker(
    pool: &PgPool,
    reason_code: &str,
) -> LifecycleResult<TrustWorkerSummary> {
    let ids = UserRepo::list_active_caregiver_ids(pool).await?;
    let mut summary = TrustWorkerSummary {
        total: ids.len(),
        updated: 0,
        unchanged: 0,
        errors: 0,
        details: Vec::with_capacity(ids.len()),
    };

    for user_id in ids {
        match update_user_trust(pool, user_id, reason_code).await {
            Ok(update) if update.changed => {
                if update.level_changed() {
                    tracing::info!(
                        user_id,
                        previous_level = %update.previous_level,
                        new_level = %update.new_level,
                        "Trust level changed",
                    );
                }
                summary.updated += 1;
                summary.details.push(SweepEntry {
                    user_id,
                    outcome: SweepOutcome::Updated,
                    error: None,
                });
            }
            Ok(_) => {
                summary.unchanged += 1;
                summary.details.push(SweepEntry {
                    user_id,
                    outcome: SweepOutcome::Unchanged,
                    error: None,
                });
            }
            Err(error) => {
                tracing::warn!(user_id, %error, "Trust recomputation failed");
                summary.errors += 1;
                summary.details.push(SweepEntry {
                    user_id,
                    outcome: SweepOutcome::Error,
                    error: Some(error.to_string()),
                });
            }
        }
    }

    tracing::info!(
        total = summary.total,
        updated = summary.updated,
        unchanged = summary.unchanged,
        errors = summary.errors,
        "Trust worker sweep finished",
    );
    Ok(summary)
}
