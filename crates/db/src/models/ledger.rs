//! Ledger transaction model.
//!
//! Rows are append-only (trigger-enforced): replaying all rows for a
//! wallet and balance kind reconstructs the current balance exactly.

use carelink_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Which wallet balance a ledger entry mutates.
pub mod balance_kinds {
    pub const AVAILABLE: &str = "available";
    pub const HELD: &str = "held";
}

/// Reference type values linking ledger entries to the operation that
/// produced them.
pub mod reference_types {
    /// External top-up onto a user wallet (admin tooling and fixtures).
    pub const DEPOSIT: &str = "deposit";
    pub const JOB_PUBLISH: &str = "job_publish";
    pub const JOB_ACCEPT: &str = "job_accept";
    pub const JOB_SETTLEMENT: &str = "job_settlement";
    pub const JOB_REFUND: &str = "job_refund";
}

/// A row from the `ledger_transactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LedgerTransaction {
    pub id: DbId,
    pub wallet_id: DbId,
    pub amount_cents: Cents,
    pub balance_kind: String,
    pub reference_type: String,
    pub reference_id: Option<DbId>,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

/// Query parameters for `GET /api/v1/wallet/ledger`.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerListQuery {
    /// Maximum number of results. Defaults to 50, capped at 200.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
