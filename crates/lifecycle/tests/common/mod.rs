//! Shared fixtures for lifecycle integration tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use sqlx::PgPool;

use carelink_core::types::{Cents, DbId};
use carelink_db::models::job::{CreateJob, Job};
use carelink_db::models::ledger::{balance_kinds, reference_types};
use carelink_db::models::user::{CreateUser, User};
use carelink_db::models::wallet::{wallet_types, Wallet};
use carelink_db::repositories::{JobRepo, LedgerRepo, UserRepo, WalletRepo};
use carelink_lifecycle::actions;

/// Standard job money: 10_000 total, 1_500 platform fee.
pub const TOTAL: Cents = 10_000;
pub const FEE: Cents = 1_500;

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

/// A hirer with a funded wallet.
pub async fn create_funded_hirer(pool: &PgPool, email: &str, funds: Cents) -> User {
    let user = create_user(pool, email, "hirer").await;
    let wallet = WalletRepo::create_for_user(pool, user.id, wallet_types::HIRER)
        .await
        .expect("create hirer wallet");
    if funds > 0 {
        credit_available(pool, wallet.id, funds).await;
    }
    user
}

/// A phone-verified caregiver at trust level L1, with an empty wallet.
pub async fn create_caregiver(pool: &PgPool, email: &str) -> User {
    let user = create_user(pool, email, "caregiver").await;
    sqlx::query("UPDATE users SET phone_verified_at = NOW(), trust_level = 'L1' WHERE id = $1")
        .bind(user.id)
        .execute(pool)
        .await
        .expect("verify caregiver");
    WalletRepo::create_for_user(pool, user.id, wallet_types::CAREGIVER)
        .await
        .expect("create caregiver wallet");
    UserRepo::find_by_id(pool, user.id)
        .await
        .expect("refetch caregiver")
        .expect("caregiver exists")
}

pub async fn create_admin(pool: &PgPool, email: &str) -> User {
    create_user(pool, email, "admin").await
}

pub async fn credit_available(pool: &PgPool, wallet_id: DbId, amount: Cents) {
    let mut tx = pool.begin().await.expect("begin");
    let applied = WalletRepo::adjust_available(tx.as_mut(), wallet_id, amount)
        .await
        .expect("adjust");
    assert!(applied);
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

pub fn job_input(start_offset_hours: i64, duration_hours: i64) -> CreateJob {
    let start = Utc::now() + Duration::hours(start_offset_hours);
    CreateJob {
        scheduled_start_at: start,
        scheduled_end_at: start + Duration::hours(duration_hours),
        hourly_rate_cents: TOTAL / duration_hours.max(1),
        total_amount_cents: TOTAL,
        platform_fee_cents: FEE,
    }
}

/// Create a draft job and publish it.
pub async fn posted_job(pool: &PgPool, hirer: &User, input: &CreateJob) -> Job {
    let job = JobRepo::create(pool, hirer.id, input).await.expect("create job");
    actions::publish_job(pool, job.id, hirer.id).await.expect("publish job")
}

/// Create, publish, and accept a job.
pub async fn assigned_job(pool: &PgPool, hirer: &User, caregiver: &User, input: &CreateJob) -> Job {
    let job = posted_job(pool, hirer, input).await;
    actions::accept_job(pool, job.id, caregiver.id).await.expect("accept job")
}

pub async fn user_wallet(pool: &PgPool, user_id: DbId, wallet_type: &str) -> Wallet {
    WalletRepo::find_for_user(pool, user_id, wallet_type)
        .await
        .expect("wallet query")
        .expect("wallet exists")
}

pub async fn escrow_wallet(pool: &PgPool, job_id: DbId) -> Wallet {
    WalletRepo::find_escrow_for_job(pool, job_id)
        .await
        .expect("escrow query")
        .expect("escrow exists")
}

pub async fn platform_wallet(pool: &PgPool) -> Wallet {
    sqlx::query_as::<_, Wallet>(
        "SELECT id, owner_user_id, job_id, wallet_type, \
                available_cents, held_cents, currency, created_at, updated_at \
         FROM wallets WHERE wallet_type = 'platform'",
    )
    .fetch_one(pool)
    .await
    .expect("platform wallet")
}

/// Assert the ledger replay matches the stored balance for one wallet.
pub async fn assert_replay_matches(pool: &PgPool, wallet: &Wallet) {
    let available = LedgerRepo::replay_balance(pool, wallet.id, balance_kinds::AVAILABLE)
        .await
        .expect("replay available");
    let held = LedgerRepo::replay_balance(pool, wallet.id, balance_kinds::HELD)
        .await
        .expect("replay held");
    assert_eq!(available, wallet.available_cents, "available replay mismatch");
    assert_eq!(held, wallet.held_cents, "held replay mismatch");
}

pub async fn ledger_row_count(pool: &PgPool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ledger_transactions")
        .fetch_one(pool)
        .await
        .expect("ledger count");
    count
}

pub async fn audit_action_types_for_job(pool: &PgPool, job_id: DbId) -> Vec<String> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT action_type FROM audit_events \
         WHERE entity_type = 'job' AND entity_id = $1 \
         ORDER BY id",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
    .expect("audit query");
    rows.into_iter().map(|(a,)| a).collect()
}
