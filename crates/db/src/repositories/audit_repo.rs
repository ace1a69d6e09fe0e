//! Repository for the `audit_events` table.

use sqlx::PgConnection;

use carelink_core::audit::action_to_category;

use crate::models::audit::{AuditEvent, NewAuditEvent};

/// Column list for `audit_events` queries.
const COLUMNS: &str = "\
    id, actor_user_id, action_type, category, entity_type, entity_id, \
    details, created_at";

/// Insert operations for audit events.
pub struct AuditRepo;

impl AuditRepo {
    /// Insert one audit event, deriving the retention category from the
    /// action type. Runs in the same transaction as the change it logs.
    pub async fn insert(
        conn: &mut PgConnection,
        event: &NewAuditEvent<'_>,
    ) -> Result<AuditEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_events \
                 (actor_user_id, action_type, category, entity_type, entity_id, details) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditEvent>(&query)
            .bind(event.actor_user_id)
            .bind(event.action_type)
            .bind(action_to_category(event.action_type))
            .bind(event.entity_type)
            .bind(event.entity_id)
            .bind(&event.details)
            .fetch_one(conn)
            .await
    }
}
