//! Job entity model and DTOs.

use carelink_core::error::CoreError;
use carelink_core::job_state::JobStatus;
use carelink_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `jobs` table.
///
/// `status` is stored as TEXT; use [`Job::parsed_status`] to get the
/// typed value. `total_amount_cents` and `platform_fee_cents` are
/// immutable after insert (enforced by a trigger).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub hirer_id: DbId,
    pub caregiver_id: Option<DbId>,
    pub status: String,
    pub scheduled_start_at: Timestamp,
    pub scheduled_end_at: Timestamp,
    pub hourly_rate_cents: Cents,
    pub total_amount_cents: Cents,
    pub platform_fee_cents: Cents,
    pub check_in_at: Option<Timestamp>,
    pub check_out_at: Option<Timestamp>,
    pub cancel_reason: Option<String>,
    pub cancelled_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    /// Parse the stored status, failing on corrupted data.
    pub fn parsed_status(&self) -> Result<JobStatus, CoreError> {
        JobStatus::parse(&self.status).ok_or_else(|| {
            CoreError::Internal(format!("Job {} has unknown status '{}'", self.id, self.status))
        })
    }
}

/// DTO for creating a draft job via `POST /api/v1/jobs`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJob {
    pub scheduled_start_at: Timestamp,
    pub scheduled_end_at: Timestamp,
    pub hourly_rate_cents: Cents,
    pub total_amount_cents: Cents,
    pub platform_fee_cents: Cents,
}

/// Query parameters for job list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    /// Filter by status (e.g. `posted`, `assigned`).
    pub status: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
