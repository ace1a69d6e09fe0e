//! Handlers for the `/jobs` resource.
//!
//! All endpoints require authentication via [`AuthUser`]. Reads hit the
//! repositories directly; every status change goes through
//! `carelink_lifecycle::actions`, which owns the transaction, the escrow
//! movement, and the audit trail. Handlers publish the matching
//! lifecycle event only after the action committed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use carelink_core::error::CoreError;
use carelink_core::policy::Action;
use carelink_core::roles::ROLE_ADMIN;
use carelink_core::types::DbId;
use carelink_db::models::job::{CreateJob, Job, JobListQuery};
use carelink_db::repositories::JobRepo;
use carelink_events::{event_types, LifecycleEvent};
use carelink_lifecycle::actions::{self, GeoPoint};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::policy::{ensure_allowed, RequireAdmin};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Optional body for check-in/check-out.
#[derive(Debug, Default, Deserialize)]
pub struct CheckBody {
    pub geo: Option<GeoPoint>,
}

/// Optional body for cancellation.
#[derive(Debug, Default, Deserialize)]
pub struct CancelBody {
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate a draft job's schedule and amounts before insert.
fn validate_create(input: &CreateJob) -> Result<(), AppError> {
    if input.scheduled_start_at >= input.scheduled_end_at {
        return Err(AppError::Core(CoreError::Validation(
            "scheduled_start_at must be before scheduled_end_at".into(),
        )));
    }
    if input.hourly_rate_cents <= 0 || input.total_amount_cents <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Job amounts must be positive".into(),
        )));
    }
    if input.platform_fee_cents < 0 || input.platform_fee_cents > input.total_amount_cents {
        return Err(AppError::Core(CoreError::Validation(
            "platform_fee_cents must be between 0 and total_amount_cents".into(),
        )));
    }
    Ok(())
}

/// Fetch a job and verify the caller is a party to it (or an admin).
async fn find_and_authorize(
    pool: &sqlx::PgPool,
    job_id: DbId,
    auth: &AuthUser,
    action: &str,
) -> AppResult<Job> {
    let job = JobRepo::find_by_id(pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;

    let is_party = job.hirer_id == auth.user_id || job.caregiver_id == Some(auth.user_id);
    if !is_party && auth.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Cannot {action} another user's job"
        ))));
    }

    Ok(job)
}

fn job_event(event_type: &str, job: &Job, auth: &AuthUser) -> LifecycleEvent {
    LifecycleEvent::new(event_type)
        .with_source("job", job.id)
        .with_actor(auth.user_id)
        .with_payload(serde_json::json!({ "status": job.status }))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs
///
/// Create a draft job owned by the calling hirer. Returns 201.
pub async fn create_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateJob>,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&auth, Action::CreateJob)?;
    validate_create(&input)?;

    let job = JobRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(job_id = job.id, hirer_id = auth.user_id, "Draft job created");

    Ok((StatusCode::CREATED, Json(DataResponse::new(job))))
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs/{id}/publish
///
/// Publish a draft job to the feed, earmarking the hirer's funds.
pub async fn publish_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&auth, Action::PublishJob)?;

    let job = actions::publish_job(&state.pool, job_id, auth.user_id).await?;

    state
        .event_bus
        .publish(job_event(event_types::JOB_PUBLISHED, &job, &auth));

    Ok(Json(DataResponse::new(job)))
}

/// POST /api/v1/jobs/{id}/accept
///
/// Accept a posted job as the calling caregiver.
pub async fn accept_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&auth, Action::AcceptJob)?;

    let job = actions::accept_job(&state.pool, job_id, auth.user_id).await?;

    state
        .event_bus
        .publish(job_event(event_types::JOB_ASSIGNED, &job, &auth));

    Ok(Json(DataResponse::new(job)))
}

/// POST /api/v1/jobs/{id}/check-in
///
/// Check in to an assigned job. Optional body carries GPS coordinates,
/// which are recorded in the audit trail.
pub async fn check_in(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    body: Option<Json<CheckBody>>,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&auth, Action::CheckIn)?;
    let geo = body.and_then(|Json(b)| b.geo);

    let job = actions::check_in(&state.pool, job_id, auth.user_id, geo).await?;

    state
        .event_bus
        .publish(job_event(event_types::JOB_CHECKED_IN, &job, &auth));

    Ok(Json(DataResponse::new(job)))
}

/// POST /api/v1/jobs/{id}/check-out
///
/// Check out of an in-progress job, settling the escrow. Idempotent: a
/// repeat call returns the settlement figures without moving money.
pub async fn check_out(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    body: Option<Json<CheckBody>>,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&auth, Action::CheckOut)?;
    let geo = body.and_then(|Json(b)| b.geo);

    let outcome = actions::check_out(&state.pool, job_id, auth.user_id, geo).await?;

    if !outcome.already_completed {
        state.event_bus.publish(
            LifecycleEvent::new(event_types::JOB_COMPLETED)
                .with_source("job", outcome.job_id)
                .with_actor(auth.user_id)
                .with_payload(serde_json::json!({
                    "caregiver_payment": outcome.caregiver_payment,
                    "platform_fee": outcome.platform_fee,
                })),
        );
    }

    Ok(Json(DataResponse::new(outcome)))
}

/// POST /api/v1/jobs/{id}/cancel
///
/// Cancel a job as the hirer or assigned caregiver, refunding held
/// money to the hirer.
pub async fn cancel_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    body: Option<Json<CancelBody>>,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&auth, Action::CancelJob)?;
    let reason = body.and_then(|Json(b)| b.reason);

    let job = actions::cancel_job(&state.pool, job_id, auth.user_id, reason).await?;

    state
        .event_bus
        .publish(job_event(event_types::JOB_CANCELLED, &job, &auth));

    Ok(Json(DataResponse::new(job)))
}

/// POST /api/v1/admin/jobs/{id}/expire
///
/// Expire a posted job that was never accepted (admin only).
pub async fn expire_job(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = actions::expire_job(&state.pool, job_id, auth.user_id).await?;

    state
        .event_bus
        .publish(job_event(event_types::JOB_EXPIRED, &job, &auth));

    Ok(Json(DataResponse::new(job)))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{id}
///
/// Get a single job. Visible to the hirer, the assigned caregiver, and
/// admins.
pub async fn get_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = find_and_authorize(&state.pool, job_id, &auth, "view").await?;
    Ok(Json(DataResponse::new(job)))
}

/// GET /api/v1/jobs
///
/// List the caller's jobs (as hirer or assigned caregiver). Supports
/// `status`, `limit`, and `offset` query parameters.
pub async fn list_jobs(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> AppResult<impl IntoResponse> {
    let jobs = JobRepo::list_for_user(&state.pool, auth.user_id, &params).await?;
    Ok(Json(DataResponse::new(jobs)))
}

/// GET /api/v1/jobs/feed
///
/// List posted jobs visible to eligible caregivers.
pub async fn list_feed(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&auth, Action::BrowseJobFeed)?;
    let jobs = JobRepo::list_posted(&state.pool, &params).await?;
    Ok(Json(DataResponse::new(jobs)))
}
