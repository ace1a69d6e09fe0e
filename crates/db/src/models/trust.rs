//! Trust score history model.

use carelink_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Reason codes recorded with each trust score change.
pub mod reason_codes {
    /// Periodic batch recomputation.
    pub const BATCH_RECALCULATION: &str = "batch_recalculation";
    /// Admin-triggered single-user update.
    pub const MANUAL_TRIGGER: &str = "manual_trigger";
    /// Event-driven update (e.g. after job completion).
    pub const EVENT_TRIGGER: &str = "event_trigger";
}

/// A row from the append-only `trust_score_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrustScoreHistory {
    pub id: DbId,
    pub user_id: DbId,
    pub previous_score: i32,
    pub new_score: i32,
    pub previous_level: String,
    pub new_level: String,
    pub delta: i32,
    pub reason_code: String,
    pub breakdown: serde_json::Value,
    pub created_at: Timestamp,
}

/// Insert payload for a history entry.
#[derive(Debug, Clone)]
pub struct NewTrustHistory<'a> {
    pub user_id: DbId,
    pub previous_score: i32,
    pub new_score: i32,
    pub previous_level: &'a str,
    pub new_level: &'a str,
    pub reason_code: &'a str,
    pub breakdown: serde_json::Value,
}
