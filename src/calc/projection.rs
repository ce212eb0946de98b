//! Scaling a per-million rate to a holder's estimate, and scenario rates.

use crate::domain::{Projection, REFERENCE_UNITS, Scenario};
use crate::stats::describe::{mean, percentile};

/// Scale a per-million daily rate to a concrete holding.
///
/// `usd_per_reward_unit` is the external conversion constant (reference
/// `0.001`, i.e. 1000 reward units = $1) and is always passed in rather than
/// read from anywhere. The yearly figures use a fixed 365-day year.
pub fn project(rate_per_million: f64, holding_units: f64, usd_per_reward_unit: f64) -> Projection {
    let scale = holding_units / REFERENCE_UNITS;
    let daily_reward = rate_per_million * scale;
    let yearly_reward = daily_reward * 365.0;
    Projection {
        daily_reward,
        yearly_reward,
        daily_usd: daily_reward * usd_per_reward_unit,
        yearly_usd: yearly_reward * usd_per_reward_unit,
    }
}

/// Resolve a scenario to a single per-million projection rate.
///
/// - conservative: `max(P25, mean * 0.85)`
/// - base: mean
/// - optimistic: P75
/// - x10 / x100 / x1000: optimistic times the multiplier (explicitly
///   hypothetical, not statistically derived)
pub fn resolve_scenario_rate(values: &[f64], scenario: Scenario) -> f64 {
    match scenario {
        Scenario::Conservative => percentile(values, 25.0).max(mean(values) * 0.85),
        Scenario::Base => mean(values),
        Scenario::Optimistic => percentile(values, 75.0),
        Scenario::X10 => percentile(values, 75.0) * 10.0,
        Scenario::X100 => percentile(values, 75.0) * 100.0,
        Scenario::X1000 => percentile(values, 75.0) * 1000.0,
    }
}

/// Average rate used by the quick calculator: the last 30 observations,
/// falling back to the whole series when fewer than 10 recent points exist.
pub fn recent_average(values: &[f64]) -> f64 {
    const RECENT: usize = 30;
    const MIN_RECENT: usize = 10;
    let start = values.len().saturating_sub(RECENT);
    let recent = &values[start..];
    if recent.len() >= MIN_RECENT {
        mean(recent)
    } else {
        mean(values)
    }
}

/// Per-million rate from a raw (reward, tokens) measurement.
///
/// Used when entering new data points: `reward / tokens * 1_000_000`.
/// Returns `0.0` when `tokens` is not a positive finite number.
pub fn per_million_rate(reward: f64, tokens: f64) -> f64 {
    if !(tokens.is_finite() && tokens > 0.0 && reward.is_finite()) {
        return 0.0;
    }
    reward / tokens * REFERENCE_UNITS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_USD_PER_REWARD_UNIT;

    #[test]
    fn projection_is_linear_in_holdings() {
        let one = project(12.5, 1_000_000.0, DEFAULT_USD_PER_REWARD_UNIT);
        let two = project(12.5, 2_000_000.0, DEFAULT_USD_PER_REWARD_UNIT);
        assert_eq!(two.daily_reward, 2.0 * one.daily_reward);
        assert_eq!(two.yearly_usd, 2.0 * one.yearly_usd);
    }

    #[test]
    fn reference_scenario_numbers() {
        // 30-day window averaging 12.5, holder with 5,000,000 tokens.
        let p = project(12.5, 5_000_000.0, DEFAULT_USD_PER_REWARD_UNIT);
        assert!((p.daily_reward - 62.5).abs() < 1e-12);
        assert!((p.yearly_reward - 22_812.5).abs() < 1e-9);
        assert!((p.daily_usd - 0.0625).abs() < 1e-12);
        assert!((p.yearly_usd - 22.8125).abs() < 1e-9);
    }

    #[test]
    fn scenario_rates_follow_the_closed_formulas() {
        let values = [10.0, 20.0, 30.0, 40.0];
        // mean 25, P25 = 10, P75 = 30.
        assert_eq!(resolve_scenario_rate(&values, Scenario::Base), 25.0);
        assert_eq!(resolve_scenario_rate(&values, Scenario::Optimistic), 30.0);
        // conservative = max(10, 25 * 0.85) = 21.25
        assert_eq!(
            resolve_scenario_rate(&values, Scenario::Conservative),
            21.25
        );
        assert_eq!(resolve_scenario_rate(&values, Scenario::X10), 300.0);
        assert_eq!(resolve_scenario_rate(&values, Scenario::X1000), 30_000.0);
    }

    #[test]
    fn recent_average_prefers_the_last_30_points() {
        // 40 points: 1.0 everywhere except the last 30 are 2.0.
        let mut values = vec![1.0; 10];
        values.extend(std::iter::repeat(2.0).take(30));
        assert_eq!(recent_average(&values), 2.0);

        // Too few recent points falls back to the full series.
        let short = vec![1.0, 2.0, 3.0];
        assert_eq!(recent_average(&short), 2.0);
    }

    #[test]
    fn per_million_rate_guards_bad_tokens() {
        assert_eq!(per_million_rate(5.0, 0.0), 0.0);
        assert_eq!(per_million_rate(5.0, -1.0), 0.0);
        assert!((per_million_rate(2.5, 500_000.0) - 5.0).abs() < 1e-12);
    }
}
