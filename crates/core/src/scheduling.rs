//! Schedule window helpers.
//!
//! Job windows are half-open `[start, end)`: a job ending at 12:00 does
//! not conflict with one starting at 12:00. Used by the assignment
//! conflict check and the punctuality trust signal.

use crate::types::Timestamp;

/// Minutes after the scheduled start within which a check-in still
/// counts as on time for trust scoring.
pub const ON_TIME_WINDOW_MINUTES: i64 = 15;

/// Half-open interval overlap test: `[a_start, a_end)` vs `[b_start, b_end)`.
pub fn windows_overlap(
    a_start: Timestamp,
    a_end: Timestamp,
    b_start: Timestamp,
    b_end: Timestamp,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Whether a check-in counts as on time relative to the scheduled start.
///
/// Early check-ins always count; late ones count up to
/// [`ON_TIME_WINDOW_MINUTES`] (inclusive).
pub fn is_on_time(check_in_at: Timestamp, scheduled_start_at: Timestamp) -> bool {
    check_in_at - scheduled_start_at <= chrono::Duration::minutes(ON_TIME_WINDOW_MINUTES)
}
