//! Job lifecycle state machine.
//!
//! The transition table is the single source of truth for which status
//! changes are legal. It is a strict DAG: no self-transitions, no cycles,
//! and the three terminal states have no outgoing edges. Execution of a
//! transition (row locking, guarded update, escrow movement) lives in
//! `carelink-lifecycle`; this module is pure lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a job over its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created by the hirer, not yet visible to caregivers.
    Draft,
    /// Published to the feed; hirer funds earmarked.
    Posted,
    /// A caregiver accepted; escrow funded.
    Assigned,
    /// Caregiver checked in.
    InProgress,
    /// Checked out and settled. Terminal.
    Completed,
    /// Cancelled by a party. Terminal.
    Cancelled,
    /// Expired unaccepted. Terminal.
    Expired,
}

impl JobStatus {
    /// Database representation (stored as TEXT in `jobs.status`).
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Posted => "posted",
            JobStatus::Assigned => "assigned",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Expired => "expired",
        }
    }

    /// Parse the database representation. Returns `None` for unknown input.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(JobStatus::Draft),
            "posted" => Some(JobStatus::Posted),
            "assigned" => Some(JobStatus::Assigned),
            "in_progress" => Some(JobStatus::InProgress),
            "completed" => Some(JobStatus::Completed),
            "cancelled" => Some(JobStatus::Cancelled),
            "expired" => Some(JobStatus::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All statuses, for exhaustive table checks.
pub const ALL_STATUSES: [JobStatus; 7] = [
    JobStatus::Draft,
    JobStatus::Posted,
    JobStatus::Assigned,
    JobStatus::InProgress,
    JobStatus::Completed,
    JobStatus::Cancelled,
    JobStatus::Expired,
];

/// Valid targets from each non-terminal status.
const DRAFT_TARGETS: &[JobStatus] = &[JobStatus::Posted];
const POSTED_TARGETS: &[JobStatus] = &[
    JobStatus::Assigned,
    JobStatus::Cancelled,
    JobStatus::Expired,
];
const ASSIGNED_TARGETS: &[JobStatus] = &[JobStatus::InProgress, JobStatus::Cancelled];
const IN_PROGRESS_TARGETS: &[JobStatus] = &[JobStatus::Completed, JobStatus::Cancelled];

/// Valid transition targets for `from`. Empty for terminal states.
pub fn valid_transitions(from: JobStatus) -> &'static [JobStatus] {
    match from {
        JobStatus::Draft => DRAFT_TARGETS,
        JobStatus::Posted => POSTED_TARGETS,
        JobStatus::Assigned => ASSIGNED_TARGETS,
        JobStatus::InProgress => IN_PROGRESS_TARGETS,
        JobStatus::Completed | JobStatus::Cancelled | JobStatus::Expired => &[],
    }
}

/// Whether `from -> to` is in the transition table.
///
/// Self-transitions are never valid, including for terminal states.
pub fn is_valid_transition(from: JobStatus, to: JobStatus) -> bool {
    valid_transitions(from).contains(&to)
}

/// Whether a status has no outgoing transitions.
pub fn is_terminal(status: JobStatus) -> bool {
    valid_transitions(status).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_can_only_be_posted() {
        assert_eq!(valid_transitions(JobStatus::Draft), &[JobStatus::Posted]);
    }

    #[test]
    fn posted_targets() {
        let targets = valid_transitions(JobStatus::Posted);
        assert_eq!(targets.len(), 3);
        assert!(targets.contains(&JobStatus::Assigned));
        assert!(targets.contains(&JobStatus::Cancelled));
        assert!(targets.contains(&JobStatus::Expired));
    }

    #[test]
    fn assigned_targets() {
        let targets = valid_transitions(JobStatus::Assigned);
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&JobStatus::InProgress));
        assert!(targets.contains(&JobStatus::Cancelled));
    }

    #[test]
    fn in_progress_targets() {
        let targets = valid_transitions(JobStatus::InProgress);
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&JobStatus::Completed));
        assert!(targets.contains(&JobStatus::Cancelled));
    }

    #[test]
    fn terminal_states_have_no_targets() {
        assert!(valid_transitions(JobStatus::Completed).is_empty());
        assert!(valid_transitions(JobStatus::Cancelled).is_empty());
        assert!(valid_transitions(JobStatus::Expired).is_empty());
    }

    #[test]
    fn self_transitions_are_never_valid() {
        for status in ALL_STATUSES {
            assert!(
                !is_valid_transition(status, status),
                "{status} -> {status} must be invalid"
            );
        }
    }

    #[test]
    fn nothing_leaves_terminal_states() {
        for from in [JobStatus::Completed, JobStatus::Cancelled, JobStatus::Expired] {
            for to in ALL_STATUSES {
                assert!(!is_valid_transition(from, to), "{from} -> {to} must be invalid");
            }
        }
    }

    #[test]
    fn exhaustive_pair_check_matches_table() {
        // Every (from, to) pair is valid iff listed here.
        let expected: &[(JobStatus, JobStatus)] = &[
            (JobStatus::Draft, JobStatus::Posted),
            (JobStatus::Posted, JobStatus::Assigned),
            (JobStatus::Posted, JobStatus::Cancelled),
            (JobStatus::Posted, JobStatus::Expired),
            (JobStatus::Assigned, JobStatus::InProgress),
            (JobStatus::Assigned, JobStatus::Cancelled),
            (JobStatus::InProgress, JobStatus::Completed),
            (JobStatus::InProgress, JobStatus::Cancelled),
        ];
        for from in ALL_STATUSES {
            for to in ALL_STATUSES {
                let valid = expected.contains(&(from, to));
                assert_eq!(
                    is_valid_transition(from, to),
                    valid,
                    "table mismatch for {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn draft_cannot_jump_to_completed() {
        assert!(!is_valid_transition(JobStatus::Draft, JobStatus::Completed));
    }

    #[test]
    fn is_terminal_matches_table() {
        assert!(is_terminal(JobStatus::Completed));
        assert!(is_terminal(JobStatus::Cancelled));
        assert!(is_terminal(JobStatus::Expired));
        assert!(!is_terminal(JobStatus::Draft));
        assert!(!is_terminal(JobStatus::Posted));
        assert!(!is_terminal(JobStatus::Assigned));
        assert!(!is_terminal(JobStatus::InProgress));
    }

    #[test]
    fn round_trips_through_db_representation() {
        for status in ALL_STATUSES {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("bogus"), None);
        assert_eq!(JobStatus::parse(""), None);
    }
}
