//! Named job actions.
//!
//! Each action is one transition request: it loads the acting user,
//! re-checks the policy gate (the API middleware already checked it, but
//! the gate is cheap and the lifecycle layer must not trust its caller),
//! and hands the domain step to [`crate::machine::execute_transition`].

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use carelink_core::audit::action_types;
use carelink_core::error::CoreError;
use carelink_core::job_state::JobStatus;
use carelink_core::money::settlement_split;
use carelink_core::policy::{can, Action, Role};
use carelink_core::scheduling::is_on_time;
use carelink_core::types::{Cents, DbId};
use carelink_db::models::job::Job;
use carelink_db::models::user::User;
use carelink_db::repositories::{JobRepo, UserRepo};

use crate::error::LifecycleResult;
use crate::escrow;
use crate::machine::{execute_transition, TransitionRequest};

/// GPS coordinates reported at check-in/check-out. Recorded in the audit
/// trail only; no geofence validation happens here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Result of a checkout, including the idempotent replay case.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutOutcome {
    pub job_id: DbId,
    pub status: JobStatus,
    pub caregiver_payment: Cents,
    pub platform_fee: Cents,
    /// `true` when the job was already completed and no money moved.
    pub already_completed: bool,
}

async fn load_actor(pool: &PgPool, user_id: DbId) -> LifecycleResult<User> {
    UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })
        .map_err(Into::into)
}

fn ensure_allowed(actor: &User, action: Action) -> Result<(), CoreError> {
    let policy_user = actor.policy_user()?;
    if !can(&policy_user, action).allowed {
        return Err(CoreError::Forbidden(format!(
            "Role '{}' at trust level {} may not perform this action",
            actor.role, actor.trust_level
        )));
    }
    Ok(())
}

fn is_admin(actor: &User) -> bool {
    Role::parse(&actor.role) == Some(Role::Admin)
}

fn geo_details(geo: Option<GeoPoint>) -> serde_json::Value {
    match geo {
        Some(point) => serde_json::json!({ "geo": point }),
        None => serde_json::json!({}),
    }
}

/// Publish a draft job to the feed, earmarking the hirer's funds.
pub async fn publish_job(
    pool: &PgPool,
    job_id: DbId,
    acting_user_id: DbId,
) -> LifecycleResult<Job> {
    let actor = load_actor(pool, acting_user_id).await?;
    ensure_allowed(&actor, Action::PublishJob)?;
    let admin = is_admin(&actor);

    let (job, _) = execute_transition(
        pool,
        TransitionRequest {
            job_id,
            to: JobStatus::Posted,
            acting_user_id,
            action_type: action_types::JOB_PUBLISH,
            details: serde_json::json!({}),
        },
        move |job| {
            if job.hirer_id != acting_user_id && !admin {
                return Err(CoreError::Forbidden(
                    "Only the job owner may publish it".into(),
                ));
            }
            Ok(())
        },
        Box::new(|conn, job| {
            Box::pin(async move {
                escrow::publish_hold(conn, job).await?;
                Ok(serde_json::json!({
                    "amount_held_cents": job.total_amount_cents,
                }))
            })
        }),
    )
    .await?;
    Ok(job)
}

/// Accept a posted job as the acting caregiver.
///
/// Checks, in order: policy gate, not the hirer's own job, no overlapping
/// active assignment. The job row lock only serializes accepts of the
/// same job, so the transaction additionally locks the caregiver's user
/// row before the overlap query: concurrent accepts of different jobs by
/// one caregiver queue on that lock, and the later one sees the earlier
/// committed assignment. On success the caregiver is recorded and the
/// escrow wallet is created and funded.
pub async fn accept_job(
    pool: &PgPool,
    job_id: DbId,
    acting_user_id: DbId,
) -> LifecycleResult<Job> {
    let actor = load_actor(pool, acting_user_id).await?;
    ensure_allowed(&actor, Action::AcceptJob)?;

    let (job, _) = execute_transition(
        pool,
        TransitionRequest {
            job_id,
            to: JobStatus::Assigned,
            acting_user_id,
            action_type: action_types::JOB_ACCEPT,
            details: serde_json::json!({}),
        },
        move |job| {
            if job.hirer_id == acting_user_id {
                return Err(CoreError::Validation(
                    "A hirer cannot accept their own job".into(),
                ));
            }
            Ok(())
        },
        Box::new(move |conn, job| {
            Box::pin(async move {
                // Accepts by one caregiver serialize on their user row;
                // without this, two accepts of different overlapping jobs
                // would each pass the overlap check before either commits.
                UserRepo::lock_for_update(conn, acting_user_id).await?;
                if let Some(conflicting) = JobRepo::find_overlapping_assignment(
                    conn,
                    acting_user_id,
                    job.scheduled_start_at,
                    job.scheduled_end_at,
                )
                .await?
                {
                    return Err(CoreError::Conflict(format!(
                        "Schedule overlaps active assignment (job {conflicting})"
                    ))
                    .into());
                }
                JobRepo::set_caregiver(conn, job.id, acting_user_id).await?;
                escrow::fund_escrow(conn, job).await?;
                Ok(serde_json::json!({
                    "caregiver_id": acting_user_id,
                    "escrow_funded_cents": job.total_amount_cents,
                }))
            })
        }),
    )
    .await?;
    Ok(job)
}

/// Check in to an assigned job as its caregiver.
pub async fn check_in(
    pool: &PgPool,
    job_id: DbId,
    acting_user_id: DbId,
    geo: Option<GeoPoint>,
) -> LifecycleResult<Job> {
    let actor = load_actor(pool, acting_user_id).await?;
    ensure_allowed(&actor, Action::CheckIn)?;

    let (job, _) = execute_transition(
        pool,
        TransitionRequest {
            job_id,
            to: JobStatus::InProgress,
            acting_user_id,
            action_type: action_types::JOB_CHECK_IN,
            details: geo_details(geo),
        },
        move |job| ensure_assigned_caregiver(job, acting_user_id, "check in"),
        Box::new(|conn, job| {
            Box::pin(async move {
                let now = chrono::Utc::now();
                JobRepo::set_check_in(conn, job.id, now).await?;
                Ok(serde_json::json!({
                    "check_in_at": now,
                    "on_time": is_on_time(now, job.scheduled_start_at),
                }))
            })
        }),
    )
    .await?;
    Ok(job)
}

/// Check out of an in-progress job, settling the escrow.
///
/// Idempotent: a repeat call after completion returns the settlement
/// figures with `already_completed = true` and moves no money. Of two
/// concurrent first calls, exactly one settles; the loser gets a
/// conflict from the transition engine.
pub async fn check_out(
    pool: &PgPool,
    job_id: DbId,
    acting_user_id: DbId,
    geo: Option<GeoPoint>,
) -> LifecycleResult<CheckOutOutcome> {
    let actor = load_actor(pool, acting_user_id).await?;
    ensure_allowed(&actor, Action::CheckOut)?;

    // Replay short-circuit: a completed job answers with the recorded
    // figures instead of an invalid-transition error.
    let existing = JobRepo::find_by_id(pool, job_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        })?;
    if existing.parsed_status()? == JobStatus::Completed {
        ensure_assigned_caregiver(&existing, acting_user_id, "check out")?;
        let split = settlement_split(existing.total_amount_cents, existing.platform_fee_cents)?;
        return Ok(CheckOutOutcome {
            job_id,
            status: JobStatus::Completed,
            caregiver_payment: split.caregiver_payment,
            platform_fee: split.platform_fee,
            already_completed: true,
        });
    }

    let (job, outcome) = execute_transition(
        pool,
        TransitionRequest {
            job_id,
            to: JobStatus::Completed,
            acting_user_id,
            action_type: action_types::JOB_CHECK_OUT,
            details: geo_details(geo),
        },
        move |job| ensure_assigned_caregiver(job, acting_user_id, "check out"),
        Box::new(|conn, job| {
            Box::pin(async move {
                JobRepo::set_check_out(conn, job.id, chrono::Utc::now()).await?;
                let split = escrow::settle(conn, job).await?;
                Ok(serde_json::json!({
                    "caregiver_payment": split.caregiver_payment,
                    "platform_fee": split.platform_fee,
                }))
            })
        }),
    )
    .await?;

    Ok(CheckOutOutcome {
        job_id: job.id,
        status: job.parsed_status()?,
        caregiver_payment: outcome["caregiver_payment"].as_i64().unwrap_or(0),
        platform_fee: outcome["platform_fee"].as_i64().unwrap_or(0),
        already_completed: false,
    })
}

/// Cancel a job, refunding held money to the hirer where applicable.
///
/// Allowed for the hirer, the assigned caregiver, or an admin. Drafts
/// cannot be cancelled (they were never funded; the transition table
/// rejects it).
pub async fn cancel_job(
    pool: &PgPool,
    job_id: DbId,
    acting_user_id: DbId,
    reason: Option<String>,
) -> LifecycleResult<Job> {
    let actor = load_actor(pool, acting_user_id).await?;
    ensure_allowed(&actor, Action::CancelJob)?;
    let admin = is_admin(&actor);

    let (job, _) = execute_transition(
        pool,
        TransitionRequest {
            job_id,
            to: JobStatus::Cancelled,
            acting_user_id,
            action_type: action_types::JOB_CANCEL,
            details: serde_json::json!({ "reason": reason.clone() }),
        },
        move |job| {
            let is_party =
                job.hirer_id == acting_user_id || job.caregiver_id == Some(acting_user_id);
            if !is_party && !admin {
                return Err(CoreError::Forbidden(
                    "Only the hirer or assigned caregiver may cancel this job".into(),
                ));
            }
            Ok(())
        },
        Box::new(move |conn, job| {
            Box::pin(async move {
                let from = job.parsed_status()?;
                escrow::refund_on_cancel(conn, job, from).await?;
                JobRepo::set_cancelled(conn, job.id, acting_user_id, reason.as_deref()).await?;
                Ok(serde_json::json!({
                    "refunded_cents": job.total_amount_cents,
                }))
            })
        }),
    )
    .await?;
    Ok(job)
}

/// Expire a posted job that was never accepted, returning the hirer's
/// earmark. Admin-triggered.
pub async fn expire_job(
    pool: &PgPool,
    job_id: DbId,
    acting_user_id: DbId,
) -> LifecycleResult<Job> {
    let actor = load_actor(pool, acting_user_id).await?;
    if !is_admin(&actor) {
        return Err(CoreError::Forbidden("Only admins may expire jobs".into()).into());
    }

    let (job, _) = execute_transition(
        pool,
        TransitionRequest {
            job_id,
            to: JobStatus::Expired,
            acting_user_id,
            action_type: action_types::JOB_EXPIRE,
            details: serde_json::json!({}),
        },
        |_| Ok(()),
        Box::new(|conn, job| {
            Box::pin(async move {
                escrow::refund_on_cancel(conn, job, JobStatus::Posted).await?;
                Ok(serde_json::json!({
                    "refunded_cents": job.total_amount_cents,
                }))
            })
        }),
    )
    .await?;
    Ok(job)
}

fn ensure_assigned_caregiver(
    job: &Job,
    acting_user_id: DbId,
    verb: &str,
) -> Result<(), CoreError> {
    if job.caregiver_id != Some(acting_user_id) {
        return Err(CoreError::Forbidden(format!(
            "Only the assigned caregiver may {verb}"
        )));
    }
    Ok(())
}
