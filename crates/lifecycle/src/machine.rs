//! The transition engine.
//!
//! [`execute_transition`] is the single path through which a job changes
//! status. It validates against the transition table, serializes
//! concurrent attempts with a `FOR UPDATE` row lock, runs the
//! caller-supplied domain step (escrow movement, timestamps) inside the
//! same transaction, and applies the status with a guarded conditional
//! update. Any failure rolls the whole transaction back, leaving job and
//! wallets untouched.

use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool};

use carelink_core::error::CoreError;
use carelink_core::job_state::{is_valid_transition, JobStatus};
use carelink_core::types::DbId;
use carelink_db::models::audit::NewAuditEvent;
use carelink_db::models::job::Job;
use carelink_db::repositories::{AuditRepo, JobRepo};

use crate::error::{LifecycleError, LifecycleResult};

/// What the engine needs to know about one transition attempt.
#[derive(Debug)]
pub struct TransitionRequest<'a> {
    pub job_id: DbId,
    pub to: JobStatus,
    pub acting_user_id: DbId,
    /// Audit action type (see `carelink_core::audit::action_types`).
    pub action_type: &'a str,
    /// Extra context merged into the audit details (geo, reason, ...).
    pub details: serde_json::Value,
}

/// The domain step executed inside the transition's transaction.
///
/// Receives the open connection and the locked job row; returns a JSON
/// value that is merged into the audit details and handed back to the
/// caller (e.g. the settlement split).
pub type TransitionFn<'a> = Box<
    dyn for<'c> FnOnce(
            &'c mut PgConnection,
            &'c Job,
        ) -> BoxFuture<'c, LifecycleResult<serde_json::Value>>
        + Send
        + 'a,
>;

/// Execute one job status transition.
///
/// Steps, all-or-nothing:
///
/// 1. Load the job (`NotFound` if absent) and validate the transition
///    against the table (`InvalidTransition` if not allowed).
/// 2. Open a transaction and re-read the job with `FOR UPDATE`. If the
///    status moved since step 1, fail with `Conflict`.
/// 3. Run `authorize` against the locked row (ownership/assignee checks).
/// 4. Run the domain step.
/// 5. Apply the status via the guarded conditional update. Zero rows
///    affected means a concurrent transition won the race: `Conflict`.
/// 6. Insert the audit row and commit.
///
/// Returns the updated job and the domain step's outcome value.
pub async fn execute_transition<A>(
    pool: &PgPool,
    request: TransitionRequest<'_>,
    authorize: A,
    transition_fn: TransitionFn<'_>,
) -> LifecycleResult<(Job, serde_json::Value)>
where
    A: FnOnce(&Job) -> Result<(), CoreError>,
{
    // Preflight read outside the transaction: cheap rejection of
    // missing jobs and table-invalid transitions before taking locks.
    let job = JobRepo::find_by_id(pool, request.job_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Job",
            id: request.job_id,
        })?;
    let from = job.parsed_status()?;
    validate(from, request.to, request.job_id)?;

    let mut tx = pool.begin().await?;

    // Re-read under the row lock; concurrent transitions serialize here.
    let job = JobRepo::find_by_id_for_update(tx.as_mut(), request.job_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Job",
            id: request.job_id,
        })?;
    let locked_from = job.parsed_status()?;
    if locked_from != from {
        return Err(CoreError::Conflict(format!(
            "Job {} status changed concurrently (expected '{from}', found '{locked_from}')",
            request.job_id
        ))
        .into());
    }

    authorize(&job).map_err(LifecycleError::Core)?;

    let outcome = transition_fn(tx.as_mut(), &job).await?;

    // The WHERE guard on the prior status is the last line of defense:
    // under the row lock it can only fail if a sibling setter moved the
    // status, which would be a bug, but the guard keeps it impossible to
    // double-apply either way.
    let updated = JobRepo::update_status_guarded(tx.as_mut(), request.job_id, from, request.to)
        .await?
        .ok_or_else(|| {
            CoreError::Conflict(format!(
                "Concurrent transition won the race on job {}",
                request.job_id
            ))
        })?;

    let details = merge_details(
        serde_json::json!({
            "from_state": from.as_str(),
            "to_state": request.to.as_str(),
        }),
        &request.details,
        &outcome,
    );
    AuditRepo::insert(
        tx.as_mut(),
        &NewAuditEvent {
            actor_user_id: Some(request.acting_user_id),
            action_type: request.action_type,
            entity_type: "job",
            entity_id: request.job_id,
            details,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        job_id = request.job_id,
        from = %from,
        to = %request.to,
        acting_user_id = request.acting_user_id,
        "Job transition applied",
    );

    Ok((updated, outcome))
}

/// Table validation shared by the engine and preflight callers.
pub fn validate(from: JobStatus, to: JobStatus, job_id: DbId) -> Result<(), CoreError> {
    if !is_valid_transition(from, to) {
        return Err(CoreError::InvalidTransition { from, to, job_id });
    }
    Ok(())
}

/// Merge base, caller, and outcome objects into one audit details value.
/// Later sources win on key collisions.
fn merge_details(
    base: serde_json::Value,
    caller: &serde_json::Value,
    outcome: &serde_json::Value,
) -> serde_json::Value {
    let mut merged = match base {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    for source in [caller, outcome] {
        if let serde_json::Value::Object(map) = source {
            for (key, value) in map {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    serde_json::Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_table_entries() {
        assert!(validate(JobStatus::Draft, JobStatus::Posted, 1).is_ok());
        assert!(validate(JobStatus::InProgress, JobStatus::Completed, 1).is_ok());
    }

    #[test]
    fn validate_rejects_jump_with_context() {
        let err = validate(JobStatus::Draft, JobStatus::Completed, 7).unwrap_err();
        match err {
            CoreError::InvalidTransition { from, to, job_id } => {
                assert_eq!(from, JobStatus::Draft);
                assert_eq!(to, JobStatus::Completed);
                assert_eq!(job_id, 7);
            }
            other => panic!("expected InvalidTransition, got {other:?}"),
        }
    }

    #[test]
    fn merge_details_later_sources_win() {
        let merged = merge_details(
            serde_json::json!({"from_state": "posted", "x": 1}),
            &serde_json::json!({"x": 2, "reason": "test"}),
            &serde_json::json!({"caregiver_payment": 100}),
        );
        assert_eq!(merged["from_state"], "posted");
        assert_eq!(merged["x"], 2);
        assert_eq!(merged["reason"], "test");
        assert_eq!(merged["caregiver_payment"], 100);
    }

    #[test]
    fn merge_details_ignores_non_objects() {
        let merged = merge_details(
            serde_json::json!({"a": 1}),
            &serde_json::json!("not an object"),
            &serde_json::Value::Null,
        );
        assert_eq!(merged, serde_json::json!({"a": 1}));
    }
}
