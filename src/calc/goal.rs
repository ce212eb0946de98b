//! Goal-seeking: inverting the projection relationship.

use crate::domain::{REFERENCE_UNITS, TOKEN_ROUNDING};

/// Tokens required to earn `desired_daily` reward units per day at the given
/// per-million rate.
///
/// The raw requirement is rounded **up** to the nearest 100,000 tokens —
/// never under-promise the tokens required. A non-positive rate returns the
/// `0.0` sentinel instead of dividing.
pub fn tokens_needed_for_daily_rate(rate_per_million: f64, desired_daily: f64) -> f64 {
    if !(rate_per_million.is_finite() && rate_per_million > 0.0) || !desired_daily.is_finite() {
        return 0.0;
    }
    let raw = desired_daily / rate_per_million * REFERENCE_UNITS;
    (raw / TOKEN_ROUNDING).ceil() * TOKEN_ROUNDING
}

/// Whole days until a cumulative USD target is reached at `daily_usd` per day.
///
/// `None` means unreachable (non-positive daily rate); the division never
/// produces a silent infinity.
pub fn days_to_milestone(daily_usd: f64, target_usd: f64) -> Option<u64> {
    if !(daily_usd.is_finite() && daily_usd > 0.0) || !target_usd.is_finite() {
        return None;
    }
    Some((target_usd / daily_usd).ceil().max(0.0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_needed_rounds_up_to_100k() {
        // desired 250 at rate 2 -> 125,000,000 exactly (already a multiple).
        assert_eq!(tokens_needed_for_daily_rate(2.0, 250.0), 125_000_000.0);

        // desired 1 at rate 3 -> 333,333.33..., rounds up to 400,000.
        let needed = tokens_needed_for_daily_rate(3.0, 1.0);
        assert_eq!(needed, 400_000.0);

        // Always the smallest multiple of 100,000 covering the raw need.
        let raw = 1.0 / 3.0 * 1_000_000.0;
        assert!(needed >= raw);
        assert!(needed - raw < 100_000.0);
        assert_eq!(needed % 100_000.0, 0.0);
    }

    #[test]
    fn zero_rate_returns_sentinel_not_infinity() {
        assert_eq!(tokens_needed_for_daily_rate(0.0, 250.0), 0.0);
        assert_eq!(tokens_needed_for_daily_rate(-1.0, 250.0), 0.0);
    }

    #[test]
    fn milestone_counts_whole_days() {
        assert_eq!(days_to_milestone(0.0625, 100.0), Some(1600));
        assert_eq!(days_to_milestone(3.0, 10.0), Some(4));
    }

    #[test]
    fn unreachable_milestone_is_none() {
        assert_eq!(days_to_milestone(0.0, 100.0), None);
        assert_eq!(days_to_milestone(-0.5, 100.0), None);
    }
}
