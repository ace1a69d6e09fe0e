//! Policy gate: (role, trust level, action) -> allow/deny.
//!
//! Pure and synchronous so it can be consulted by route middleware before
//! a transaction is opened and re-checked inside one without a behavior
//! change. Admins are always allowed. For other roles, each action maps
//! to a minimum trust level per role, or to a denial when the role may
//! never perform it.

use crate::roles::{ROLE_ADMIN, ROLE_CAREGIVER, ROLE_HIRER};
use crate::trust::TrustLevel;
use serde::Serialize;

/// Marketplace user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Hirer,
    Caregiver,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Hirer => ROLE_HIRER,
            Role::Caregiver => ROLE_CAREGIVER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Parse the database representation. Returns `None` for unknown input.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ROLE_HIRER => Some(Role::Hirer),
            ROLE_CAREGIVER => Some(Role::Caregiver),
            ROLE_ADMIN => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Actions the gate knows about. Every core operation and gated route
/// names one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateJob,
    PublishJob,
    AcceptJob,
    CheckIn,
    CheckOut,
    CancelJob,
    BrowseJobFeed,
    RequestWithdrawal,
    ManageBankAccount,
    SendMessage,
    TriggerTrustUpdate,
}

/// The slice of a user the gate needs. Built from JWT claims by the API
/// layer and from the user row by the lifecycle layer.
#[derive(Debug, Clone, Copy)]
pub struct PolicyUser {
    pub role: Role,
    pub trust_level: TrustLevel,
}

/// Gate verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub allowed: bool,
}

/// Minimum trust level required for `role` to perform `action`, or
/// `None` when the role may never perform it. Admin is handled before
/// this table is consulted.
fn required_level(role: Role, action: Action) -> Option<TrustLevel> {
    match (role, action) {
        // Hirer job management requires no behavioral trust.
        (Role::Hirer, Action::CreateJob)
        | (Role::Hirer, Action::PublishJob)
        | (Role::Hirer, Action::CancelJob)
        | (Role::Hirer, Action::ManageBankAccount)
        | (Role::Hirer, Action::SendMessage) => Some(TrustLevel::L0),

        // Caregiver work actions require at least phone verification.
        (Role::Caregiver, Action::BrowseJobFeed)
        | (Role::Caregiver, Action::AcceptJob)
        | (Role::Caregiver, Action::CheckIn)
        | (Role::Caregiver, Action::CheckOut)
        | (Role::Caregiver, Action::CancelJob)
        | (Role::Caregiver, Action::ManageBankAccount)
        | (Role::Caregiver, Action::SendMessage) => Some(TrustLevel::L1),

        // Moving money out needs KYC.
        (Role::Caregiver, Action::RequestWithdrawal) => Some(TrustLevel::L2),
        (Role::Hirer, Action::RequestWithdrawal) => Some(TrustLevel::L0),

        // Everything else is off-limits for the role.
        (Role::Hirer, Action::AcceptJob)
        | (Role::Hirer, Action::CheckIn)
        | (Role::Hirer, Action::CheckOut)
        | (Role::Hirer, Action::BrowseJobFeed)
        | (Role::Caregiver, Action::CreateJob)
        | (Role::Caregiver, Action::PublishJob)
        | (_, Action::TriggerTrustUpdate) => None,

        // Admin rows are unreachable (short-circuited in `can`), but the
        // match must be total.
        (Role::Admin, _) => Some(TrustLevel::L0),
    }
}

/// Decide whether `user` may perform `action`.
pub fn can(user: &PolicyUser, action: Action) -> Decision {
    if user.role == Role::Admin {
        return Decision { allowed: true };
    }
    let allowed = match required_level(user.role, action) {
        Some(minimum) => user.trust_level >= minimum,
        None => false,
    };
    Decision { allowed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, trust_level: TrustLevel) -> PolicyUser {
        PolicyUser { role, trust_level }
    }

    #[test]
    fn admin_always_allowed() {
        for action in [
            Action::CreateJob,
            Action::AcceptJob,
            Action::RequestWithdrawal,
            Action::TriggerTrustUpdate,
        ] {
            assert!(can(&user(Role::Admin, TrustLevel::L0), action).allowed);
        }
    }

    #[test]
    fn hirer_manages_own_jobs_at_l0() {
        let hirer = user(Role::Hirer, TrustLevel::L0);
        assert!(can(&hirer, Action::CreateJob).allowed);
        assert!(can(&hirer, Action::PublishJob).allowed);
        assert!(can(&hirer, Action::CancelJob).allowed);
        assert!(can(&hirer, Action::ManageBankAccount).allowed);
    }

    #[test]
    fn hirer_cannot_do_caregiver_actions() {
        let hirer = user(Role::Hirer, TrustLevel::L3);
        assert!(!can(&hirer, Action::AcceptJob).allowed);
        assert!(!can(&hirer, Action::CheckIn).allowed);
        assert!(!can(&hirer, Action::CheckOut).allowed);
        assert!(!can(&hirer, Action::BrowseJobFeed).allowed);
    }

    #[test]
    fn caregiver_feed_requires_l1() {
        assert!(!can(&user(Role::Caregiver, TrustLevel::L0), Action::BrowseJobFeed).allowed);
        assert!(can(&user(Role::Caregiver, TrustLevel::L1), Action::BrowseJobFeed).allowed);
    }

    #[test]
    fn caregiver_accept_requires_l1() {
        assert!(!can(&user(Role::Caregiver, TrustLevel::L0), Action::AcceptJob).allowed);
        assert!(can(&user(Role::Caregiver, TrustLevel::L1), Action::AcceptJob).allowed);
    }

    #[test]
    fn caregiver_withdrawal_requires_l2() {
        assert!(!can(&user(Role::Caregiver, TrustLevel::L1), Action::RequestWithdrawal).allowed);
        assert!(can(&user(Role::Caregiver, TrustLevel::L2), Action::RequestWithdrawal).allowed);
        assert!(can(&user(Role::Caregiver, TrustLevel::L3), Action::RequestWithdrawal).allowed);
    }

    #[test]
    fn bank_management_role_asymmetry() {
        // Hirers may manage bank accounts at L0; caregivers need L1.
        assert!(can(&user(Role::Hirer, TrustLevel::L0), Action::ManageBankAccount).allowed);
        assert!(!can(&user(Role::Caregiver, TrustLevel::L0), Action::ManageBankAccount).allowed);
        assert!(can(&user(Role::Caregiver, TrustLevel::L1), Action::ManageBankAccount).allowed);
    }

    #[test]
    fn caregivers_cannot_create_or_publish() {
        let caregiver = user(Role::Caregiver, TrustLevel::L3);
        assert!(!can(&caregiver, Action::CreateJob).allowed);
        assert!(!can(&caregiver, Action::PublishJob).allowed);
    }

    #[test]
    fn trust_trigger_is_admin_only() {
        assert!(!can(&user(Role::Hirer, TrustLevel::L3), Action::TriggerTrustUpdate).allowed);
        assert!(!can(&user(Role::Caregiver, TrustLevel::L3), Action::TriggerTrustUpdate).allowed);
        assert!(can(&user(Role::Admin, TrustLevel::L0), Action::TriggerTrustUpdate).allowed);
    }

    #[test]
    fn higher_level_satisfies_lower_requirement() {
        assert!(can(&user(Role::Caregiver, TrustLevel::L3), Action::CheckIn).allowed);
    }

    #[test]
    fn role_round_trips_through_db_representation() {
        for role in [Role::Hirer, Role::Caregiver, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("moderator"), None);
    }
}
