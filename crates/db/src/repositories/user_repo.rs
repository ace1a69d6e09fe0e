//! Repository for the `users` table.

use sqlx::{PgConnection, PgPool};

use carelink_core::roles::ROLE_CAREGIVER;
use carelink_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list for `users` queries.
const COLUMNS: &str = "\
    id, email, display_name, bio, experience_years, role, \
    phone_verified_at, email_verified_at, kyc_status, bank_verified_at, \
    trust_score, trust_level, is_active, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Create a user (admin tooling and test fixtures).
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, role, display_name, bio, experience_years) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.role)
            .bind(&input.display_name)
            .bind(&input.bio)
            .bind(input.experience_years)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// IDs of all active caregivers, oldest account first. The trust
    /// worker iterates this list sequentially.
    pub async fn list_active_caregiver_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT id FROM users WHERE role = $1 AND is_active ORDER BY id",
        )
        .bind(ROLE_CAREGIVER)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Take a row lock on one user inside a transaction.
    ///
    /// Transactions whose correctness depends on seeing each other's
    /// committed writes about this user (for example two accepts by the
    /// same caregiver on different jobs) serialize here.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Write a new trust snapshot onto the user row.
    ///
    /// Conditional on the stored values actually differing, so a
    /// concurrent identical update is a no-op. Returns `true` when the
    /// row changed.
    pub async fn update_trust(
        conn: &mut PgConnection,
        user_id: DbId,
        trust_score: i32,
        trust_level: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users \
             SET trust_score = $2, trust_level = $3, updated_at = NOW() \
             WHERE id = $1 AND (trust_score <> $2 OR trust_level <> $3)",
        )
        .bind(user_id)
        .bind(trust_score)
        .bind(trust_level)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
