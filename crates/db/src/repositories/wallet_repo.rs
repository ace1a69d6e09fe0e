//! Repository for the `wallets` table.
//!
//! Balance mutations use guarded updates: the WHERE clause re-checks
//! that the balance stays non-negative, so a lost race surfaces as zero
//! rows affected rather than a constraint violation. Callers must pair
//! every successful adjustment with a ledger append in the same
//! transaction.

use sqlx::{PgConnection, PgPool};

use carelink_core::types::{Cents, DbId};

use crate::models::wallet::{wallet_types, Wallet};

/// Column list for `wallets` queries.
const COLUMNS: &str = "\
    id, owner_user_id, job_id, wallet_type, \
    available_cents, held_cents, currency, created_at, updated_at";

/// Provides lookup and balance-mutation operations for wallets.
pub struct WalletRepo;

impl WalletRepo {
    /// Create a wallet for a user (at registration, or from fixtures).
    pub async fn create_for_user(
        pool: &PgPool,
        user_id: DbId,
        wallet_type: &str,
    ) -> Result<Wallet, sqlx::Error> {
        let query = format!(
            "INSERT INTO wallets (owner_user_id, wallet_type) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wallet>(&query)
            .bind(user_id)
            .bind(wallet_type)
            .fetch_one(pool)
            .await
    }

    /// Find a user's wallet of the given type.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        wallet_type: &str,
    ) -> Result<Option<Wallet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wallets WHERE owner_user_id = $1 AND wallet_type = $2"
        );
        sqlx::query_as::<_, Wallet>(&query)
            .bind(user_id)
            .bind(wallet_type)
            .fetch_optional(pool)
            .await
    }

    /// Find and lock a user's wallet inside a transaction.
    pub async fn find_for_user_for_update(
        conn: &mut PgConnection,
        user_id: DbId,
        wallet_type: &str,
    ) -> Result<Option<Wallet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wallets \
             WHERE owner_user_id = $1 AND wallet_type = $2 \
             FOR UPDATE"
        );
        sqlx::query_as::<_, Wallet>(&query)
            .bind(user_id)
            .bind(wallet_type)
            .fetch_optional(conn)
            .await
    }

    /// Create the escrow wallet for a job.
    ///
    /// The partial unique index on `job_id` makes a second escrow wallet
    /// for the same job a constraint violation.
    pub async fn create_escrow(
        conn: &mut PgConnection,
        job_id: DbId,
        currency: &str,
    ) -> Result<Wallet, sqlx::Error> {
        let query = format!(
            "INSERT INTO wallets (job_id, wallet_type, currency) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wallet>(&query)
            .bind(job_id)
            .bind(wallet_types::ESCROW)
            .bind(currency)
            .fetch_one(conn)
            .await
    }

    /// Find a job's escrow wallet.
    pub async fn find_escrow_for_job(
        pool: &PgPool,
        job_id: DbId,
    ) -> Result<Option<Wallet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wallets WHERE job_id = $1 AND wallet_type = 'escrow'"
        );
        sqlx::query_as::<_, Wallet>(&query)
            .bind(job_id)
            .fetch_optional(pool)
            .await
    }

    /// Find and lock a job's escrow wallet inside a transaction.
    ///
    /// Settlement must hold this lock while it checks the held balance,
    /// so two settlement attempts cannot both pass the check.
    pub async fn find_escrow_for_job_for_update(
        conn: &mut PgConnection,
        job_id: DbId,
    ) -> Result<Option<Wallet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wallets \
             WHERE job_id = $1 AND wallet_type = 'escrow' \
             FOR UPDATE"
        );
        sqlx::query_as::<_, Wallet>(&query)
            .bind(job_id)
            .fetch_optional(conn)
            .await
    }

    /// Find and lock the singleton platform fee wallet.
    pub async fn find_platform_for_update(
        conn: &mut PgConnection,
    ) -> Result<Option<Wallet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wallets WHERE wallet_type = 'platform' FOR UPDATE"
        );
        sqlx::query_as::<_, Wallet>(&query).fetch_optional(conn).await
    }

    /// Adjust a wallet's available balance by `delta` (may be negative).
    ///
    /// Returns `false` when the adjustment would drive the balance
    /// negative — the row is left untouched and the caller must roll
    /// back the transaction.
    pub async fn adjust_available(
        conn: &mut PgConnection,
        wallet_id: DbId,
        delta: Cents,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE wallets \
             SET available_cents = available_cents + $2, updated_at = NOW() \
             WHERE id = $1 AND available_cents + $2 >= 0",
        )
        .bind(wallet_id)
        .bind(delta)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Adjust a wallet's held balance by `delta` (may be negative).
    ///
    /// Same guard semantics as [`WalletRepo::adjust_available`].
    pub async fn adjust_held(
        conn: &mut PgConnection,
        wallet_id: DbId,
        delta: Cents,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE wallets \
             SET held_cents = held_cents + $2, updated_at = NOW() \
             WHERE id = $1 AND held_cents + $2 >= 0",
        )
        .bind(wallet_id)
        .bind(delta)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
