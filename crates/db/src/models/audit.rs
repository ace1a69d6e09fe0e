//! Audit event model.

use carelink_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `audit_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditEvent {
    pub id: DbId,
    pub actor_user_id: Option<DbId>,
    pub action_type: String,
    pub category: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

/// Insert payload for an audit event. The category is derived from the
/// action type at insert time (see `AuditRepo::insert`).
#[derive(Debug, Clone)]
pub struct NewAuditEvent<'a> {
    pub actor_user_id: Option<DbId>,
    pub action_type: &'a str,
    pub entity_type: &'a str,
    pub entity_id: DbId,
    pub details: serde_json::Value,
}
