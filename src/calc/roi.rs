//! ROI & APY over a holding period.

use chrono::NaiveDate;

use crate::domain::{REFERENCE_UNITS, RoiSummary};

/// ROI and annualized yield for a holding bought at `avg_buy_price` and held
/// since `start` (inclusive).
///
/// Matches the community calculator: `days_held` counts both endpoints
/// (`today - start + 1`), rewards accrue at the window-average rate, and a
/// zero invested amount or zero holding period produces `0` percentages
/// rather than a division error.
pub fn roi_apy(
    holdings: f64,
    avg_buy_price: f64,
    start: NaiveDate,
    today: NaiveDate,
    avg_rate_per_million: f64,
    usd_per_reward_unit: f64,
) -> RoiSummary {
    let days_held = (today - start).num_days() + 1;
    let daily_reward = holdings / REFERENCE_UNITS * avg_rate_per_million;
    let total_usd = daily_reward * usd_per_reward_unit * days_held.max(0) as f64;

    let invested = holdings * avg_buy_price;
    let roi_pct = if invested > 0.0 {
        total_usd / invested * 100.0
    } else {
        0.0
    };
    let apy_pct = if days_held > 0 {
        roi_pct * 365.0 / days_held as f64
    } else {
        0.0
    };

    RoiSummary {
        days_held,
        daily_reward,
        total_usd,
        roi_pct,
        apy_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_USD_PER_REWARD_UNIT;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn known_numbers() {
        // 1M tokens at rate 100/day per 1M: 100 ZYP/day = $0.10/day.
        // Held 2025-01-01..=2025-04-10 inclusive = 100 days -> $10 earned.
        // Invested $1,000,000 at $1/token -> ROI 0.001%.
        let out = roi_apy(
            1_000_000.0,
            1.0,
            d("2025-01-01"),
            d("2025-04-10"),
            100.0,
            DEFAULT_USD_PER_REWARD_UNIT,
        );
        assert_eq!(out.days_held, 100);
        assert!((out.daily_reward - 100.0).abs() < 1e-12);
        assert!((out.total_usd - 10.0).abs() < 1e-9);
        assert!((out.roi_pct - 0.001).abs() < 1e-12);
        assert!((out.apy_pct - 0.001 * 3.65).abs() < 1e-12);
    }

    #[test]
    fn zero_invested_gives_zero_percentages() {
        let out = roi_apy(
            0.0,
            2.0,
            d("2025-01-01"),
            d("2025-01-31"),
            50.0,
            DEFAULT_USD_PER_REWARD_UNIT,
        );
        assert_eq!(out.roi_pct, 0.0);
        assert_eq!(out.apy_pct, 0.0);
    }

    #[test]
    fn same_day_counts_as_one_day_held() {
        let out = roi_apy(
            1_000_000.0,
            1.0,
            d("2025-06-01"),
            d("2025-06-01"),
            10.0,
            DEFAULT_USD_PER_REWARD_UNIT,
        );
        assert_eq!(out.days_held, 1);
        assert!((out.total_usd - 0.01).abs() < 1e-12);
    }
}
