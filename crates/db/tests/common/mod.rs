//! Shared fixtures for db integration tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use sqlx::PgPool;

use carelink_core::types::{Cents, DbId};
use carelink_db::models::job::CreateJob;
use carelink_db::models::ledger::{balance_kinds, reference_types};
use carelink_db::models::user::{CreateUser, User};
use carelink_db::models::wallet::Wallet;
use carelink_db::repositories::{LedgerRepo, UserRepo, WalletRepo};

/// Create a user with a complete profile.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            role: role.to_string(),
            display_name: Some("Test User".into()),
            bio: Some("Experienced test fixture".into()),
            experience_years: Some(3),
        },
    )
    .await
    .expect("create user")
}

/// Create a phone-verified caregiver at trust level L1.
pub async fn create_caregiver(pool: &PgPool, email: &str) -> User {
    let user = create_user(pool, email, "caregiver").await;
    sqlx::query("UPDATE users SET phone_verified_at = NOW(), trust_level = 'L1' WHERE id = $1")
        .bind(user.id)
        .execute(pool)
        .await
        .expect("verify caregiver");
    UserRepo::find_by_id(pool, user.id)
        .await
        .expect("refetch caregiver")
        .expect("caregiver exists")
}

/// Create a wallet and credit its available balance (with the paired
/// deposit ledger row).
pub async fn wallet_with_funds(
    pool: &PgPool,
    user_id: DbId,
    wallet_type: &str,
    amount: Cents,
) -> Wallet {
    let wallet = WalletRepo::create_for_user(pool, user_id, wallet_type)
        .await
        .expect("create wallet");
    if amount > 0 {
        credit_available(pool, wallet.id, amount).await;
    }
    fetch_wallet(pool, wallet.id).await
}

/// Credit a wallet's available balance and append the deposit ledger row.
pub async fn credit_available(pool: &PgPool, wallet_id: DbId, amount: Cents) {
    let mut tx = pool.begin().await.expect("begin");
    let applied = WalletRepo::adjust_available(tx.as_mut(), wallet_id, amount)
        .await
        .expect("adjust");
    assert!(applied, "deposit should never fail the non-negative guard");
    LedgerRepo::append(
        tx.as_mut(),
        wallet_id,
        amount,
        balance_kinds::AVAILABLE,
        reference_types::DEPOSIT,
        None,
        Some("test deposit"),
    )
    .await
    .expect("ledger append");
    tx.commit().await.expect("commit");
}

/// Re-read a wallet row by id.
pub async fn fetch_wallet(pool: &PgPool, wallet_id: DbId) -> Wallet {
    sqlx::query_as::<_, Wallet>(
        "SELECT id, owner_user_id, job_id, wallet_type, \
                available_cents, held_cents, currency, created_at, updated_at \
         FROM wallets WHERE id = $1",
    )
    .bind(wallet_id)
    .fetch_one(pool)
    .await
    .expect("fetch wallet")
}

/// A draft-job input scheduled `start_offset_hours` from now, lasting
/// `duration_hours`.
pub fn job_input(
    start_offset_hours: i64,
    duration_hours: i64,
    total: Cents,
    fee: Cents,
) -> CreateJob {
    let start = Utc::now() + Duration::hours(start_offset_hours);
    CreateJob {
        scheduled_start_at: start,
        scheduled_end_at: start + Duration::hours(duration_hours),
        hourly_rate_cents: total / duration_hours.max(1),
        total_amount_cents: total,
        platform_fee_cents: fee,
    }
}
