//! Repository for the append-only `ledger_transactions` table.

use sqlx::{PgConnection, PgPool};

use carelink_core::types::{Cents, DbId};

use crate::models::ledger::{LedgerListQuery, LedgerTransaction};

/// Column list for `ledger_transactions` queries.
const COLUMNS: &str = "\
    id, wallet_id, amount_cents, balance_kind, \
    reference_type, reference_id, note, created_at";

/// Maximum page size for ledger listing.
const MAX_LIMIT: i64 = 200;

/// Default page size for ledger listing.
const DEFAULT_LIMIT: i64 = 50;

/// Append and read operations for ledger entries. There is no update or
/// delete — the table trigger rejects both.
pub struct LedgerRepo;

impl LedgerRepo {
    /// Append one ledger entry. Must run in the same transaction as the
    /// wallet balance mutation it records.
    #[allow(clippy::too_many_arguments)]
    pub async fn append(
        conn: &mut PgConnection,
        wallet_id: DbId,
        amount_cents: Cents,
        balance_kind: &str,
        reference_type: &str,
        reference_id: Option<DbId>,
        note: Option<&str>,
    ) -> Result<LedgerTransaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO ledger_transactions \
                 (wallet_id, amount_cents, balance_kind, reference_type, reference_id, note) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LedgerTransaction>(&query)
            .bind(wallet_id)
            .bind(amount_cents)
            .bind(balance_kind)
            .bind(reference_type)
            .bind(reference_id)
            .bind(note)
            .fetch_one(conn)
            .await
    }

    /// List a wallet's ledger entries, newest first.
    pub async fn list_for_wallet(
        pool: &PgPool,
        wallet_id: DbId,
        params: &LedgerListQuery,
    ) -> Result<Vec<LedgerTransaction>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);
        let query = format!(
            "SELECT {COLUMNS} FROM ledger_transactions \
             WHERE wallet_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, LedgerTransaction>(&query)
            .bind(wallet_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Sum all entries for one wallet balance kind.
    ///
    /// Replaying the ledger this way must reconstruct the wallet's
    /// current balance exactly; integration tests assert it after every
    /// money-moving scenario.
    pub async fn replay_balance(
        pool: &PgPool,
        wallet_id: DbId,
        balance_kind: &str,
    ) -> Result<Cents, sqlx::Error> {
        let (sum,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM ledger_transactions \
             WHERE wallet_id = $1 AND balance_kind = $2",
        )
        .bind(wallet_id)
        .bind(balance_kind)
        .fetch_one(pool)
        .await?;
        Ok(sum)
    }
}
