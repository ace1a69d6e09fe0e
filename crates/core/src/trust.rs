//! Trust scoring and level determination.
//!
//! The score is recomputed from behavioral signals by the trust worker
//! (`carelink-lifecycle`); this module holds the pure rules. Levels gate
//! which job actions a user may trigger (see [`crate::policy`]).
//!
//! Level L3 uses hysteresis: entering requires score >=
//! [`L3_ENTRY_SCORE`], but a user already at L3 keeps it down to
//! [`L3_RETAIN_SCORE`] so jitter around the threshold does not flap the
//! level. There is no band on the L2 floor — dropping below the retain
//! score (or losing a prerequisite) demotes immediately.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Scoring constants
// ---------------------------------------------------------------------------

/// Everyone starts from here before signals are applied.
pub const BASE_SCORE: i32 = 50;

/// Points per completed job.
pub const COMPLETED_JOB_POINTS: i32 = 5;
/// Cap on the completed-jobs contribution.
pub const COMPLETED_JOBS_CAP: i32 = 30;

/// Points per 4-5 star review.
pub const POSITIVE_REVIEW_POINTS: i32 = 3;
/// Points per 3 star review.
pub const NEUTRAL_REVIEW_POINTS: i32 = 1;
/// Points per 1-2 star review (negative).
pub const NEGATIVE_REVIEW_POINTS: i32 = -5;
/// The total reviews contribution is clamped to this band.
pub const REVIEWS_MIN: i32 = -20;
pub const REVIEWS_MAX: i32 = 20;

/// Points per cancellation as caregiver.
pub const CANCELLATION_POINTS: i32 = -10;
/// Floor on the cancellations contribution.
pub const CANCELLATIONS_FLOOR: i32 = -30;

/// Points per GPS-fraud-flagged event.
pub const GPS_FLAG_POINTS: i32 = -3;
/// Floor on the GPS flags contribution.
pub const GPS_FLAGS_FLOOR: i32 = -15;

/// Points per on-time check-in.
pub const ON_TIME_POINTS: i32 = 2;
/// Cap on the punctuality contribution.
pub const ON_TIME_CAP: i32 = 20;

/// Flat bonus when display name, bio, and experience years are all set.
pub const PROFILE_BONUS: i32 = 10;

/// Score required to newly reach L3.
pub const L3_ENTRY_SCORE: i32 = 80;
/// Score required to stay at L3 once there (hysteresis).
pub const L3_RETAIN_SCORE: i32 = 75;

// ---------------------------------------------------------------------------
// Trust level
// ---------------------------------------------------------------------------

/// Tiered capability gate, derived from verification status and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrustLevel {
    L0,
    L1,
    L2,
    L3,
}

impl TrustLevel {
    /// Database representation (stored as TEXT in `users.trust_level`).
    pub fn as_str(self) -> &'static str {
        match self {
            TrustLevel::L0 => "L0",
            TrustLevel::L1 => "L1",
            TrustLevel::L2 => "L2",
            TrustLevel::L3 => "L3",
        }
    }

    /// Parse the database representation. Returns `None` for unknown input.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "L0" => Some(TrustLevel::L0),
            "L1" => Some(TrustLevel::L1),
            "L2" => Some(TrustLevel::L2),
            "L3" => Some(TrustLevel::L3),
            _ => None,
        }
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Signals and breakdown
// ---------------------------------------------------------------------------

/// Behavioral inputs to the score, gathered from job/review/GPS history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustSignals {
    /// Jobs completed as caregiver.
    pub completed_jobs: i64,
    /// Reviews rated 4 or 5 stars.
    pub positive_reviews: i64,
    /// Reviews rated 3 stars.
    pub neutral_reviews: i64,
    /// Reviews rated 1 or 2 stars.
    pub negative_reviews: i64,
    /// Cancellations as caregiver.
    pub cancellations: i64,
    /// GPS-fraud-flagged events.
    pub gps_fraud_flags: i64,
    /// Check-ins within the on-time window of the scheduled start.
    pub on_time_check_ins: i64,
    /// Display name, bio, and experience years all present.
    pub profile_complete: bool,
}

/// Per-component score contributions, after caps and floors.
///
/// Serialized into `trust_score_history.breakdown` so a score change is
/// explainable after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustBreakdown {
    pub base: i32,
    pub completed_jobs: i32,
    pub reviews: i32,
    pub cancellations: i32,
    pub gps_flags: i32,
    pub punctuality: i32,
    pub profile: i32,
    /// Sum of all components, clamped to `[0, 100]`.
    pub total: i32,
}

/// Verification prerequisites read from the user row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verification {
    pub phone_verified: bool,
    pub email_verified: bool,
    pub kyc_approved: bool,
    pub bank_verified: bool,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn saturating_i32(n: i64) -> i32 {
    n.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Compute the trust score breakdown from behavioral signals.
///
/// Pure: the caller (the trust worker) is responsible for gathering the
/// signals and persisting the result.
pub fn calculate_trust_score(signals: &TrustSignals) -> TrustBreakdown {
    let completed_jobs =
        (saturating_i32(signals.completed_jobs).saturating_mul(COMPLETED_JOB_POINTS))
            .min(COMPLETED_JOBS_CAP);

    let raw_reviews = saturating_i32(signals.positive_reviews)
        .saturating_mul(POSITIVE_REVIEW_POINTS)
        .saturating_add(
            saturating_i32(signals.neutral_reviews).saturating_mul(NEUTRAL_REVIEW_POINTS),
        )
        .saturating_add(
            saturating_i32(signals.negative_reviews).saturating_mul(NEGATIVE_REVIEW_POINTS),
        );
    let reviews = raw_reviews.clamp(REVIEWS_MIN, REVIEWS_MAX);

    let cancellations = (saturating_i32(signals.cancellations)
        .saturating_mul(CANCELLATION_POINTS))
    .max(CANCELLATIONS_FLOOR);

    let gps_flags =
        (saturating_i32(signals.gps_fraud_flags).saturating_mul(GPS_FLAG_POINTS)).max(GPS_FLAGS_FLOOR);

    let punctuality =
        (saturating_i32(signals.on_time_check_ins).saturating_mul(ON_TIME_POINTS)).min(ON_TIME_CAP);

    let profile = if signals.profile_complete { PROFILE_BONUS } else { 0 };

    let total = (BASE_SCORE + completed_jobs + reviews + cancellations + gps_flags + punctuality
        + profile)
        .clamp(0, 100);

    TrustBreakdown {
        base: BASE_SCORE,
        completed_jobs,
        reviews,
        cancellations,
        gps_flags,
        punctuality,
        profile,
        total,
    }
}

// ---------------------------------------------------------------------------
// Level determination
// ---------------------------------------------------------------------------

/// Map a score and verification status to a trust level, given the
/// user's current level.
///
/// Prerequisites: L1 requires phone verification; L2 adds KYC approval;
/// L3 adds bank verification and score >= [`L3_ENTRY_SCORE`] to enter
/// (>= [`L3_RETAIN_SCORE`] to stay). Email verification alone grants
/// nothing above L0 — phone is the primary identity channel.
pub fn determine_trust_level(
    current: TrustLevel,
    score: i32,
    verification: &Verification,
) -> TrustLevel {
    let l3_prerequisites = verification.phone_verified
        && verification.kyc_approved
        && verification.bank_verified;

    if l3_prerequisites {
        if current == TrustLevel::L3 && score >= L3_RETAIN_SCORE {
            return TrustLevel::L3;
        }
        if score >= L3_ENTRY_SCORE {
            return TrustLevel::L3;
        }
    }

    if verification.phone_verified && verification.kyc_approved {
        return TrustLevel::L2;
    }
    if verification.phone_verified {
        return TrustLevel::L1;
    }
    TrustLevel::L0
}
