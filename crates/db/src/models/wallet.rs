//! Wallet entity model.

use carelink_core::types::{Cents, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Wallet type values stored in `wallets.wallet_type`.
pub mod wallet_types {
    pub const HIRER: &str = "hirer";
    pub const CAREGIVER: &str = "caregiver";
    pub const ESCROW: &str = "escrow";
    pub const PLATFORM: &str = "platform";
}

/// A row from the `wallets` table.
///
/// Exactly one of `owner_user_id` (hirer/caregiver wallets) and `job_id`
/// (escrow wallets) is set; the platform wallet has neither. Balances
/// are non-negative by CHECK constraint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Wallet {
    pub id: DbId,
    pub owner_user_id: Option<DbId>,
    pub job_id: Option<DbId>,
    pub wallet_type: String,
    pub available_cents: Cents,
    pub held_cents: Cents,
    pub currency: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
