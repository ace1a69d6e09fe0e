//! Gathers behavioral trust signals for one user.
//!
//! Reads job/review/GPS history without locking: the trust worker's view
//! is eventually correct, not linearizable (its own write is guarded
//! separately, see `UserRepo::update_trust`).

use sqlx::PgPool;

use carelink_core::trust::TrustSignals;

use crate::models::user::User;
use crate::repositories::JobRepo;

/// Read-only signal collection for trust scoring.
pub struct TrustSignalRepo;

impl TrustSignalRepo {
    /// Gather all scoring inputs for `user`.
    pub async fn gather(pool: &PgPool, user: &User) -> Result<TrustSignals, sqlx::Error> {
        let completed_jobs = JobRepo::count_completed_for_caregiver(pool, user.id).await?;
        let cancellations = JobRepo::count_cancellations_by_caregiver(pool, user.id).await?;
        let on_time_check_ins = JobRepo::count_on_time_check_ins(pool, user.id).await?;

        let (positive_reviews, neutral_reviews, negative_reviews): (i64, i64, i64) =
            sqlx::query_as(
                "SELECT \
                     COUNT(*) FILTER (WHERE rating >= 4), \
                     COUNT(*) FILTER (WHERE rating = 3), \
                     COUNT(*) FILTER (WHERE rating <= 2) \
                 FROM reviews WHERE subject_id = $1",
            )
            .bind(user.id)
            .fetch_one(pool)
            .await?;

        let (gps_fraud_flags,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM gps_fraud_flags WHERE caregiver_id = $1")
                .bind(user.id)
                .fetch_one(pool)
                .await?;

        Ok(TrustSignals {
            completed_jobs,
            positive_reviews,
            neutral_reviews,
            negative_reviews,
            cancellations,
            gps_fraud_flags,
            on_time_check_ins,
            profile_complete: user.profile_complete(),
        })
    }
}
