//! Audit logging constants and utility functions.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! the API layer, the lifecycle engine, and the trust worker alike.

// ---------------------------------------------------------------------------
// Action type constants
// ---------------------------------------------------------------------------

/// Known action types for audit log entries.
pub mod action_types {
    pub const JOB_CREATE: &str = "job_create";
    pub const JOB_PUBLISH: &str = "job_publish";
    pub const JOB_ACCEPT: &str = "job_accept";
    pub const JOB_CHECK_IN: &str = "job_check_in";
    pub const JOB_CHECK_OUT: &str = "job_check_out";
    pub const JOB_CANCEL: &str = "job_cancel";
    pub const JOB_EXPIRE: &str = "job_expire";
    pub const WALLET_ADJUSTMENT: &str = "wallet_adjustment";
    pub const TRUST_UPDATE: &str = "trust_update";
    pub const SYSTEM: &str = "system";
}

// ---------------------------------------------------------------------------
// Log category constants
// ---------------------------------------------------------------------------

/// Known log categories for retention policy grouping.
pub mod log_categories {
    pub const OPERATIONS: &str = "operations";
    pub const FINANCE: &str = "finance";
    pub const TRUST: &str = "trust";
    pub const SYSTEM: &str = "system";
}

// ---------------------------------------------------------------------------
// Action-to-category mapping
// ---------------------------------------------------------------------------

/// Map an action type to its log category.
///
/// Money-moving transitions are filed under `finance` so the ledger and
/// its audit trail share a retention policy. Unknown action types
/// default to `"operations"`.
pub fn action_to_category(action_type: &str) -> &'static str {
    match action_type {
        action_types::JOB_PUBLISH
        | action_types::JOB_ACCEPT
        | action_types::JOB_CHECK_OUT
        | action_types::WALLET_ADJUSTMENT => log_categories::FINANCE,
        action_types::TRUST_UPDATE => log_categories::TRUST,
        action_types::SYSTEM => log_categories::SYSTEM,
        // Remaining lifecycle actions (create, check-in, cancel, expire).
        _ => log_categories::OPERATIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_moving_actions_map_to_finance() {
        assert_eq!(action_to_category(action_types::JOB_PUBLISH), log_categories::FINANCE);
        assert_eq!(action_to_category(action_types::JOB_ACCEPT), log_categories::FINANCE);
        assert_eq!(action_to_category(action_types::JOB_CHECK_OUT), log_categories::FINANCE);
        assert_eq!(
            action_to_category(action_types::WALLET_ADJUSTMENT),
            log_categories::FINANCE,
        );
    }

    #[test]
    fn trust_update_maps_to_trust() {
        assert_eq!(action_to_category(action_types::TRUST_UPDATE), log_categories::TRUST);
    }

    #[test]
    fn system_maps_to_system() {
        assert_eq!(action_to_category(action_types::SYSTEM), log_categories::SYSTEM);
    }

    #[test]
    fn check_in_maps_to_operations() {
        assert_eq!(action_to_category(action_types::JOB_CHECK_IN), log_categories::OPERATIONS);
    }

    #[test]
    fn cancel_maps_to_operations() {
        assert_eq!(action_to_category(action_types::JOB_CANCEL), log_categories::OPERATIONS);
    }

    #[test]
    fn unknown_action_maps_to_operations() {
        assert_eq!(action_to_category("some_unknown_action"), log_categories::OPERATIONS);
    }
}
