//! Window report computation and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the statistics code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use chrono::NaiveDate;

use crate::domain::{BestWindow, CompareBase, Observation, WindowToken};
use crate::series;
use crate::stats;

pub mod format;

pub use format::*;

/// Everything the stats screen shows for one window.
#[derive(Debug, Clone)]
pub struct WindowReport {
    pub window: WindowToken,
    pub n_days: usize,

    pub avg: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
    pub total: f64,

    pub best_day: Option<(f64, NaiveDate)>,
    pub quietest_day: Option<(f64, NaiveDate)>,
    pub best7: BestWindow,
    pub top3: Vec<(f64, NaiveDate)>,

    pub std_dev: f64,
    pub cv_pct: f64,
    pub trailing7: f64,
    pub days_above_median: usize,
    pub days_above_median_pct: f64,

    /// Average of the comparison baseline, and the delta of the current
    /// average against it. `delta_pct` is `None` when there is no usable
    /// baseline (empty, zero, or "all" under prior-window).
    pub baseline_avg: f64,
    pub delta_pct: Option<f64>,

    /// Running total per day, for the cumulative chart overlay.
    pub cumulative: Vec<f64>,
}

/// Compute the full report for a window of the series.
///
/// `full_series` is the entire normalized history; the baseline is built
/// from observations strictly before the window cutoff.
pub fn compute_report(
    full_series: &[Observation],
    window_obs: &[Observation],
    token: WindowToken,
    compare: CompareBase,
    today: NaiveDate,
) -> WindowReport {
    let values = series::values(window_obs);
    let labels = series::labels(window_obs);
    let n_days = values.len();

    let avg = stats::mean(&values);
    let med = stats::median(&values);

    let best_day = extreme_day(&values, &labels, |v, best| v > best);
    let quietest_day = extreme_day(&values, &labels, |v, best| v < best);

    let mut ranked: Vec<(f64, NaiveDate)> =
        values.iter().copied().zip(labels.iter().copied()).collect();
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    let top3 = ranked.into_iter().take(3).collect();

    let above = values.iter().filter(|&&v| v > med).count();
    let above_pct = if n_days > 0 {
        above as f64 / n_days as f64 * 100.0
    } else {
        0.0
    };

    let (baseline_avg, delta_pct) = baseline_delta(full_series, token, compare, today, n_days, avg);

    let mut running = 0.0;
    let cumulative = values
        .iter()
        .map(|v| {
            running += v;
            running
        })
        .collect();

    WindowReport {
        window: token,
        n_days,
        avg,
        median: med,
        p25: stats::percentile(&values, 25.0),
        p75: stats::percentile(&values, 75.0),
        total: values.iter().sum(),
        best_day,
        quietest_day,
        best7: stats::best_seven_day_window(&values, &labels),
        top3,
        std_dev: stats::std_dev(&values),
        cv_pct: stats::coefficient_of_variation(&values),
        trailing7: stats::trailing_seven_day_average(&values),
        days_above_median: above,
        days_above_median_pct: above_pct,
        baseline_avg,
        delta_pct,
        cumulative,
    }
}

/// First (earliest) day winning under the given strict comparison.
fn extreme_day(
    values: &[f64],
    labels: &[NaiveDate],
    better: impl Fn(f64, f64) -> bool,
) -> Option<(f64, NaiveDate)> {
    let mut out: Option<(f64, NaiveDate)> = None;
    for (&v, &d) in values.iter().zip(labels) {
        match out {
            Some((best, _)) if !better(v, best) => {}
            _ => out = Some((v, d)),
        }
    }
    out
}

/// Comparison baseline average and the delta of `avg` against it.
fn baseline_delta(
    full_series: &[Observation],
    token: WindowToken,
    compare: CompareBase,
    today: NaiveDate,
    n_days: usize,
    avg: f64,
) -> (f64, Option<f64>) {
    let prior = match token.days() {
        Some(days) => series::before(full_series, today - chrono::Duration::days(days)),
        // "all" has no observations before it.
        None => Vec::new(),
    };
    let prior_values = series::values(&prior);

    let take = match compare {
        CompareBase::Prior7d => 7,
        CompareBase::Prior30d => 30,
        CompareBase::PriorWindow => {
            if token == WindowToken::All {
                return (0.0, None);
            }
            n_days
        }
    };
    let start = prior_values.len().saturating_sub(take);
    let baseline = stats::mean(&prior_values[start..]);

    if baseline == 0.0 {
        (baseline, None)
    } else {
        (baseline, Some((avg - baseline) / baseline * 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawRecord;

    fn rec(date: &str, reward: f64) -> RawRecord {
        RawRecord {
            date: Some(date.to_string()),
            reward_per_token: Some(reward),
        }
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn daily_series(today: NaiveDate, days: i64, value: impl Fn(i64) -> f64) -> Vec<Observation> {
        let records: Vec<RawRecord> = (0..days)
            .map(|i| {
                let date = today - chrono::Duration::days(days - 1 - i);
                rec(&date.to_string(), value(i))
            })
            .collect();
        series::normalize(&records)
    }

    #[test]
    fn report_matches_hand_computed_values() {
        let today = d("2025-06-30");
        // 10 days: 1, 2, ..., 10 ending today.
        let full = daily_series(today, 10, |i| (i + 1) as f64);
        let window = series::window_for(&full, WindowToken::D7, today);
        let report = compute_report(&full, &window, WindowToken::D7, CompareBase::Prior7d, today);

        // Last 8 days fall inside the 7d cutoff (date >= today - 7).
        assert_eq!(report.n_days, 8);
        assert_eq!(report.total, 3.0 + 4.0 + 5.0 + 6.0 + 7.0 + 8.0 + 9.0 + 10.0);
        assert_eq!(report.best_day, Some((10.0, today)));
        assert_eq!(report.quietest_day, Some((3.0, d("2025-06-23"))));
        assert_eq!(report.top3[0].0, 10.0);
        assert_eq!(report.top3.len(), 3);

        // Best 7-day window of an increasing series is the last one.
        assert_eq!(report.best7.start, Some(d("2025-06-24")));

        // Baseline: the (up to) 7 observations before the cutoff are [1, 2].
        assert_eq!(report.baseline_avg, 1.5);
        let delta = report.delta_pct.unwrap();
        assert!((delta - (report.avg - 1.5) / 1.5 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn all_window_with_prior_window_baseline_has_no_delta() {
        let today = d("2025-06-30");
        let full = daily_series(today, 20, |_| 5.0);
        let report = compute_report(&full, &full, WindowToken::All, CompareBase::PriorWindow, today);
        assert_eq!(report.delta_pct, None);
        assert_eq!(report.baseline_avg, 0.0);
    }

    #[test]
    fn cumulative_is_a_running_total() {
        let today = d("2025-06-30");
        let full = daily_series(today, 3, |i| (i + 1) as f64);
        let report = compute_report(&full, &full, WindowToken::All, CompareBase::Prior7d, today);
        assert_eq!(report.cumulative, vec![1.0, 3.0, 6.0]);
    }

    #[test]
    fn empty_window_is_all_sentinels() {
        let report = compute_report(&[], &[], WindowToken::D30, CompareBase::Prior30d, d("2025-06-30"));
        assert_eq!(report.n_days, 0);
        assert_eq!(report.avg, 0.0);
        assert_eq!(report.best_day, None);
        assert_eq!(report.best7.start, None);
        assert_eq!(report.delta_pct, None);
        assert!(report.top3.is_empty());
    }
}
