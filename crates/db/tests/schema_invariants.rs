//! Invariants enforced by the schema itself: append-only triggers,
//! immutable job amounts, partial unique indexes, and the seeded
//! platform wallet.

mod common;

use sqlx::PgPool;

use carelink_db::models::trust::{reason_codes, NewTrustHistory};
use carelink_db::repositories::{JobRepo, TrustHistoryRepo, WalletRepo};

#[sqlx::test(migrations = "../../db/migrations")]
async fn platform_wallet_is_seeded_once(pool: PgPool) {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM wallets WHERE wallet_type = 'platform'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);

    // The partial unique index rejects a second platform wallet.
    let result = sqlx::query("INSERT INTO wallets (wallet_type) VALUES ('platform')")
        .execute(&pool)
        .await;
    assert!(result.is_err(), "second platform wallet must be rejected");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ledger_rows_cannot_be_updated_or_deleted(pool: PgPool) {
    let user = common::create_user(&pool, "hirer@example.com", "hirer").await;
    let wallet = common::wallet_with_funds(&pool, user.id, "hirer", 5_000).await;

    let (entry_id,): (i64,) =
        sqlx::query_as("SELECT id FROM ledger_transactions WHERE wallet_id = $1")
            .bind(wallet.id)
            .fetch_one(&pool)
            .await
            .unwrap();

    let update = sqlx::query("UPDATE ledger_transactions SET amount_cents = 1 WHERE id = $1")
        .bind(entry_id)
        .execute(&pool)
        .await;
    assert!(update.is_err(), "ledger update must be rejected");

    let delete = sqlx::query("DELETE FROM ledger_transactions WHERE id = $1")
        .bind(entry_id)
        .execute(&pool)
        .await;
    assert!(delete.is_err(), "ledger delete must be rejected");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trust_history_is_append_only(pool: PgPool) {
    let user = common::create_caregiver(&pool, "cg@example.com").await;

    let mut conn = pool.acquire().await.unwrap();
    let entry = TrustHistoryRepo::append(
        &mut conn,
        &NewTrustHistory {
            user_id: user.id,
            previous_score: 50,
            new_score: 60,
            previous_level: "L1",
            new_level: "L1",
            reason_code: reason_codes::MANUAL_TRIGGER,
            breakdown: serde_json::json!({"base": 50}),
        },
    )
    .await
    .unwrap();
    assert_eq!(entry.delta, 10);

    let update = sqlx::query("UPDATE trust_score_history SET new_score = 99 WHERE id = $1")
        .bind(entry.id)
        .execute(&pool)
        .await;
    assert!(update.is_err(), "history update must be rejected");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn job_amounts_are_immutable(pool: PgPool) {
    let hirer = common::create_user(&pool, "hirer@example.com", "hirer").await;
    let job = JobRepo::create(&pool, hirer.id, &common::job_input(24, 2, 10_000, 1_500))
        .await
        .unwrap();

    let result = sqlx::query("UPDATE jobs SET total_amount_cents = 99 WHERE id = $1")
        .bind(job.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "repricing a job must be rejected");

    // Non-amount columns stay mutable.
    sqlx::query("UPDATE jobs SET status = 'posted' WHERE id = $1")
        .bind(job.id)
        .execute(&pool)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn one_escrow_wallet_per_job(pool: PgPool) {
    let hirer = common::create_user(&pool, "hirer@example.com", "hirer").await;
    let job = JobRepo::create(&pool, hirer.id, &common::job_input(24, 2, 10_000, 1_500))
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    WalletRepo::create_escrow(&mut conn, job.id, "USD").await.unwrap();

    let second = WalletRepo::create_escrow(&mut conn, job.id, "USD").await;
    assert!(second.is_err(), "second escrow wallet for a job must be rejected");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_status_value_is_rejected(pool: PgPool) {
    let hirer = common::create_user(&pool, "hirer@example.com", "hirer").await;
    let job = JobRepo::create(&pool, hirer.id, &common::job_input(24, 2, 10_000, 1_500))
        .await
        .unwrap();

    let result = sqlx::query("UPDATE jobs SET status = 'paused' WHERE id = $1")
        .bind(job.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "unknown status value must be rejected");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inverted_schedule_window_is_rejected(pool: PgPool) {
    let hirer = common::create_user(&pool, "hirer@example.com", "hirer").await;
    let mut input = common::job_input(24, 2, 10_000, 1_500);
    std::mem::swap(&mut input.scheduled_start_at, &mut input.scheduled_end_at);

    let result = JobRepo::create(&pool, hirer.id, &input).await;
    assert!(result.is_err(), "end-before-start window must be rejected");
}
