//! Repository for the `jobs` table.
//!
//! Status changes go through [`JobRepo::update_status_guarded`]: the
//! WHERE clause on the prior status is the optimistic guard that makes
//! concurrent transitions race-safe (exactly one writer wins).

use sqlx::{PgConnection, PgPool};

use carelink_core::job_state::JobStatus;
use carelink_core::scheduling::ON_TIME_WINDOW_MINUTES;
use carelink_core::types::{DbId, Timestamp};

use crate::models::job::{CreateJob, Job, JobListQuery};

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    id, hirer_id, caregiver_id, status, \
    scheduled_start_at, scheduled_end_at, \
    hourly_rate_cents, total_amount_cents, platform_fee_cents, \
    check_in_at, check_out_at, cancel_reason, cancelled_by, \
    created_at, updated_at";

/// Maximum page size for job listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for job listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD and transition-support operations for jobs.
pub struct JobRepo;

impl JobRepo {
    /// Create a new job in `draft` status, owned by the hirer.
    pub async fn create(
        pool: &PgPool,
        hirer_id: DbId,
        input: &CreateJob,
    ) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs \
                 (hirer_id, status, scheduled_start_at, scheduled_end_at, \
                  hourly_rate_cents, total_amount_cents, platform_fee_cents) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(hirer_id)
            .bind(JobStatus::Draft.as_str())
            .bind(input.scheduled_start_at)
            .bind(input.scheduled_end_at)
            .bind(input.hourly_rate_cents)
            .bind(input.total_amount_cents)
            .bind(input.platform_fee_cents)
            .fetch_one(pool)
            .await
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Re-read a job inside a transaction with a row lock.
    ///
    /// `SELECT ... FOR UPDATE` serializes concurrent transitions on the
    /// same job for the remainder of the transaction.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Apply a status transition with an optimistic guard on the prior
    /// status.
    ///
    /// Returns `None` when zero rows matched, meaning a concurrent
    /// transition already moved the job out of `from` — the caller must
    /// treat that as a conflict and roll back.
    pub async fn update_status_guarded(
        conn: &mut PgConnection,
        id: DbId,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(conn)
            .await
    }

    /// Record the accepting caregiver. Runs inside the accept transaction,
    /// before the guarded status update.
    pub async fn set_caregiver(
        conn: &mut PgConnection,
        id: DbId,
        caregiver_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE jobs SET caregiver_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(caregiver_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Record the check-in timestamp.
    pub async fn set_check_in(
        conn: &mut PgConnection,
        id: DbId,
        at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE jobs SET check_in_at = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Record the check-out timestamp.
    pub async fn set_check_out(
        conn: &mut PgConnection,
        id: DbId,
        at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE jobs SET check_out_at = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Record who cancelled the job and why.
    pub async fn set_cancelled(
        conn: &mut PgConnection,
        id: DbId,
        cancelled_by: DbId,
        reason: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE jobs SET cancelled_by = $2, cancel_reason = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(cancelled_by)
        .bind(reason)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Find an active commitment of `caregiver_id` whose schedule window
    /// overlaps `[start, end)`.
    ///
    /// Half-open overlap: a job ending exactly at `start` does not
    /// conflict. Only `assigned` and `in_progress` jobs count.
    pub async fn find_overlapping_assignment(
        conn: &mut PgConnection,
        caregiver_id: DbId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM jobs \
             WHERE caregiver_id = $1 \
               AND status IN ('assigned', 'in_progress') \
               AND scheduled_start_at < $3 \
               AND $2 < scheduled_end_at \
             LIMIT 1",
        )
        .bind(caregiver_id)
        .bind(start)
        .bind(end)
        .fetch_optional(conn)
        .await?;
        Ok(row.map(|(id,)| id))
    }

    /// Count completed jobs for a caregiver (trust signal).
    pub async fn count_completed_for_caregiver(
        pool: &PgPool,
        caregiver_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM jobs WHERE caregiver_id = $1 AND status = 'completed'",
        )
        .bind(caregiver_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Count jobs the caregiver themselves cancelled (trust signal).
    pub async fn count_cancellations_by_caregiver(
        pool: &PgPool,
        caregiver_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM jobs \
             WHERE caregiver_id = $1 AND status = 'cancelled' AND cancelled_by = $1",
        )
        .bind(caregiver_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Count on-time check-ins for a caregiver (trust signal).
    ///
    /// On time means checked in no later than the on-time window after
    /// the scheduled start.
    pub async fn count_on_time_check_ins(
        pool: &PgPool,
        caregiver_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM jobs \
             WHERE caregiver_id = $1 \
               AND check_in_at IS NOT NULL \
               AND check_in_at <= scheduled_start_at + make_interval(mins => $2)",
        )
        .bind(caregiver_id)
        .bind(ON_TIME_WINDOW_MINUTES as i32)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// List jobs posted to the feed (visible to eligible caregivers).
    pub async fn list_posted(
        pool: &PgPool,
        params: &JobListQuery,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);
        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             WHERE status = 'posted' \
             ORDER BY scheduled_start_at ASC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List a user's jobs — as hirer or as assigned caregiver — with an
    /// optional status filter.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        params: &JobListQuery,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);
        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             WHERE (hirer_id = $1 OR caregiver_id = $1) \
               AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(user_id)
            .bind(params.status.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
