//! Escrow settlement protocol.
//!
//! Money movement at each transition boundary:
//!
//! - publish: the hirer's available balance is reduced by the job total
//!   (earmarked; held funds are tracked on the escrow wallet only, never
//!   duplicated on the hirer side).
//! - accept: an escrow wallet scoped to the job is created and funded
//!   with `held = total`.
//! - checkout: the escrow's held balance is debited by the total, the
//!   caregiver receives `total - platform_fee`, and the platform wallet
//!   receives the fee.
//! - cancel: the stage-appropriate refund back to the hirer.
//!
//! Every balance mutation is paired with a ledger append in the same
//! transaction; no function here commits — they all run inside the
//! transition engine's transaction.

use sqlx::PgConnection;

use carelink_core::error::CoreError;
use carelink_core::job_state::JobStatus;
use carelink_core::money::{settlement_split, SettlementSplit};
use carelink_core::types::Cents;
use carelink_db::models::job::Job;
use carelink_db::models::ledger::{balance_kinds, reference_types};
use carelink_db::models::wallet::{wallet_types, Wallet};
use carelink_db::repositories::{LedgerRepo, WalletRepo};

use crate::error::LifecycleResult;

/// Debit or credit one wallet balance and append the paired ledger row.
///
/// A guarded adjustment that matches zero rows means the balance would
/// go negative; surfaced as `InsufficientFunds` with `context`.
async fn move_balance(
    conn: &mut PgConnection,
    wallet: &Wallet,
    delta: Cents,
    balance_kind: &str,
    reference_type: &str,
    job_id: i64,
    context: &str,
) -> LifecycleResult<()> {
    let applied = match balance_kind {
        balance_kinds::HELD => WalletRepo::adjust_held(conn, wallet.id, delta).await?,
        _ => WalletRepo::adjust_available(conn, wallet.id, delta).await?,
    };
    if !applied {
        return Err(CoreError::InsufficientFunds(context.to_string()).into());
    }
    LedgerRepo::append(conn, wallet.id, delta, balance_kind, reference_type, Some(job_id), None)
        .await?;
    Ok(())
}

/// Publish step: earmark the hirer's funds for the job.
pub async fn publish_hold(conn: &mut PgConnection, job: &Job) -> LifecycleResult<()> {
    let wallet = WalletRepo::find_for_user_for_update(conn, job.hirer_id, wallet_types::HIRER)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Wallet",
            id: job.hirer_id,
        })?;
    move_balance(
        conn,
        &wallet,
        -job.total_amount_cents,
        balance_kinds::AVAILABLE,
        reference_types::JOB_PUBLISH,
        job.id,
        "Insufficient wallet balance to publish job",
    )
    .await
}

/// Accept step: create and fund the job's escrow wallet.
///
/// This is the only place held funds are recorded for the job's money.
pub async fn fund_escrow(conn: &mut PgConnection, job: &Job) -> LifecycleResult<Wallet> {
    let escrow = WalletRepo::create_escrow(conn, job.id, "USD").await?;
    move_balance(
        conn,
        &escrow,
        job.total_amount_cents,
        balance_kinds::HELD,
        reference_types::JOB_ACCEPT,
        job.id,
        "Escrow funding failed",
    )
    .await?;
    Ok(escrow)
}

/// Checkout step: settle the escrow into caregiver and platform wallets.
///
/// The escrow wallet is locked with `FOR UPDATE` before the balance
/// check, under the same transaction that holds the job row lock, so two
/// settlement attempts can never both pass.
pub async fn settle(conn: &mut PgConnection, job: &Job) -> LifecycleResult<SettlementSplit> {
    let split = settlement_split(job.total_amount_cents, job.platform_fee_cents)?;

    let caregiver_id = job.caregiver_id.ok_or_else(|| {
        CoreError::Internal(format!("Job {} has no caregiver at settlement", job.id))
    })?;

    let escrow = WalletRepo::find_escrow_for_job_for_update(conn, job.id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Escrow wallet",
            id: job.id,
        })?;
    if escrow.held_cents < job.total_amount_cents {
        return Err(
            CoreError::InsufficientFunds("Insufficient escrow balance for settlement".into())
                .into(),
        );
    }

    move_balance(
        conn,
        &escrow,
        -job.total_amount_cents,
        balance_kinds::HELD,
        reference_types::JOB_SETTLEMENT,
        job.id,
        "Insufficient escrow balance for settlement",
    )
    .await?;

    let caregiver_wallet =
        WalletRepo::find_for_user_for_update(conn, caregiver_id, wallet_types::CAREGIVER)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Wallet",
                id: caregiver_id,
            })?;
    move_balance(
        conn,
        &caregiver_wallet,
        split.caregiver_payment,
        balance_kinds::AVAILABLE,
        reference_types::JOB_SETTLEMENT,
        job.id,
        "Caregiver credit failed",
    )
    .await?;

    // The fee goes to the explicit platform wallet so conservation is
    // visible in the ledger rather than implied.
    if split.platform_fee > 0 {
        let platform = WalletRepo::find_platform_for_update(conn)
            .await?
            .ok_or(CoreError::Internal("Platform wallet missing".into()))?;
        move_balance(
            conn,
            &platform,
            split.platform_fee,
            balance_kinds::AVAILABLE,
            reference_types::JOB_SETTLEMENT,
            job.id,
            "Platform fee credit failed",
        )
        .await?;
    }

    Ok(split)
}

/// Cancel step: return the job's money to the hirer.
///
/// What gets reversed depends on how far the job got:
/// - `posted`: the publish earmark is returned to the hirer.
/// - `assigned` / `in_progress`: the escrow's held funds are released
///   back to the hirer's available balance.
pub async fn refund_on_cancel(
    conn: &mut PgConnection,
    job: &Job,
    from: JobStatus,
) -> LifecycleResult<()> {
    let hirer_wallet =
        WalletRepo::find_for_user_for_update(conn, job.hirer_id, wallet_types::HIRER)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Wallet",
                id: job.hirer_id,
            })?;

    if matches!(from, JobStatus::Assigned | JobStatus::InProgress) {
        let escrow = WalletRepo::find_escrow_for_job_for_update(conn, job.id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Escrow wallet",
                id: job.id,
            })?;
        move_balance(
            conn,
            &escrow,
            -job.total_amount_cents,
            balance_kinds::HELD,
            reference_types::JOB_REFUND,
            job.id,
            "Insufficient escrow balance for refund",
        )
        .await?;
    }

    move_balance(
        conn,
        &hirer_wallet,
        job.total_amount_cents,
        balance_kinds::AVAILABLE,
        reference_types::JOB_REFUND,
        job.id,
        "Hirer refund failed",
    )
    .await
}
