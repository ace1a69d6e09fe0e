//! Repository for the append-only `trust_score_history` table.

use sqlx::{PgConnection, PgPool};

use carelink_core::types::DbId;

use crate::models::trust::{NewTrustHistory, TrustScoreHistory};

/// Column list for `trust_score_history` queries.
const COLUMNS: &str = "\
    id, user_id, previous_score, new_score, previous_level, new_level, \
    delta, reason_code, breakdown, created_at";

/// Append and read operations for trust score history.
pub struct TrustHistoryRepo;

impl TrustHistoryRepo {
    /// Append one history entry. Runs in the same transaction as the
    /// user-row trust update it records.
    pub async fn append(
        conn: &mut PgConnection,
        entry: &NewTrustHistory<'_>,
    ) -> Result<TrustScoreHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO trust_score_history \
                 (user_id, previous_score, new_score, previous_level, new_level, \
                  delta, reason_code, breakdown) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrustScoreHistory>(&query)
            .bind(entry.user_id)
            .bind(entry.previous_score)
            .bind(entry.new_score)
            .bind(entry.previous_level)
            .bind(entry.new_level)
            .bind(entry.new_score - entry.previous_score)
            .bind(entry.reason_code)
            .bind(&entry.breakdown)
            .fetch_one(conn)
            .await
    }

    /// A user's history, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<TrustScoreHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trust_score_history \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, TrustScoreHistory>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
