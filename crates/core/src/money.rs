//! Settlement arithmetic.
//!
//! The split is computed once, in one place, so conservation
//! (`caregiver_payment + platform_fee == total`) holds by construction
//! everywhere a settlement happens.

use crate::error::CoreError;
use crate::types::Cents;

/// How a job's total is divided at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementSplit {
    /// What the caregiver receives: `total - platform_fee`.
    pub caregiver_payment: Cents,
    /// What the platform wallet receives.
    pub platform_fee: Cents,
}

/// Compute the settlement split for a job.
///
/// Fails with [`CoreError::Validation`] if the amounts are negative or
/// the fee exceeds the total. Both amounts are fixed at job creation, so
/// a failure here means corrupted data rather than bad user input.
pub fn settlement_split(total: Cents, platform_fee: Cents) -> Result<SettlementSplit, CoreError> {
    if total < 0 || platform_fee < 0 {
        return Err(CoreError::Validation(format!(
            "Settlement amounts must be non-negative (total={total}, fee={platform_fee})"
        )));
    }
    if platform_fee > total {
        return Err(CoreError::Validation(format!(
            "Platform fee {platform_fee} exceeds job total {total}"
        )));
    }
    Ok(SettlementSplit {
        caregiver_payment: total - platform_fee,
        platform_fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_conserves_total() {
        let split = settlement_split(10_000, 1_500).unwrap();
        assert_eq!(split.caregiver_payment, 8_500);
        assert_eq!(split.platform_fee, 1_500);
        assert_eq!(split.caregiver_payment + split.platform_fee, 10_000);
    }

    #[test]
    fn zero_fee_pays_caregiver_everything() {
        let split = settlement_split(5_000, 0).unwrap();
        assert_eq!(split.caregiver_payment, 5_000);
        assert_eq!(split.platform_fee, 0);
    }

    #[test]
    fn fee_equal_to_total_is_allowed() {
        let split = settlement_split(100, 100).unwrap();
        assert_eq!(split.caregiver_payment, 0);
    }

    #[test]
    fn fee_above_total_rejected() {
        assert!(settlement_split(100, 101).is_err());
    }

    #[test]
    fn negative_amounts_rejected() {
        assert!(settlement_split(-1, 0).is_err());
        assert!(settlement_split(100, -1).is_err());
    }
}
