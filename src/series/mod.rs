//! Observation series normalization and windowing.
//!
//! The remote store hands us unordered documents with untrusted fields; this
//! module is the boundary that turns them into a clean ascending series and
//! slices that series by relative or explicit date windows.
//!
//! Policy inherited from the original tracker: malformed records are dropped
//! silently (data quality over completeness). `normalize_counted` exposes the
//! drop count for callers that want to surface it.

use chrono::NaiveDate;

use crate::domain::{Observation, RawRecord, WindowToken};

/// Normalize raw documents into an ascending observation series.
///
/// Records missing a parseable `YYYY-MM-DD` date or a finite reward value are
/// dropped. The sort is stable, so records sharing a date keep input order.
pub fn normalize(records: &[RawRecord]) -> Vec<Observation> {
    normalize_counted(records).0
}

/// Like [`normalize`], but also reports how many records were dropped.
pub fn normalize_counted(records: &[RawRecord]) -> (Vec<Observation>, usize) {
    let mut out = Vec::with_capacity(records.len());
    for rec in records {
        let Some(date) = rec.date.as_deref().and_then(parse_date) else {
            continue;
        };
        let Some(reward) = rec.reward_per_token.filter(|v| v.is_finite()) else {
            continue;
        };
        out.push(Observation {
            date,
            reward_per_unit: reward,
        });
    }
    let dropped = records.len() - out.len();
    out.sort_by_key(|obs| obs.date);
    (out, dropped)
}

/// Select observations inside a relative lookback window.
///
/// `today` is injected by the caller so runs are reproducible. The cutoff is
/// `today - N` days at midnight (date-only comparison); `all` keeps the
/// entire series.
pub fn window_for(series: &[Observation], token: WindowToken, today: NaiveDate) -> Vec<Observation> {
    let Some(days) = token.days() else {
        return series.to_vec();
    };
    let cutoff = today - chrono::Duration::days(days);
    series
        .iter()
        .filter(|obs| obs.date >= cutoff)
        .cloned()
        .collect()
}

/// Select observations inside an explicit inclusive `[start, end]` range.
///
/// Missing or unparseable bounds are treated as absent, never as errors.
pub fn window_between(
    series: &[Observation],
    start: Option<&str>,
    end: Option<&str>,
) -> Vec<Observation> {
    let start = start.and_then(parse_date);
    let end = end.and_then(parse_date);
    series
        .iter()
        .filter(|obs| {
            if let Some(start) = start {
                if obs.date < start {
                    return false;
                }
            }
            if let Some(end) = end {
                if obs.date > end {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

/// Observations strictly before the given date, in ascending order.
///
/// Used to build comparison baselines ("prior window", "prior 7d", ...).
pub fn before(series: &[Observation], cutoff: NaiveDate) -> Vec<Observation> {
    series
        .iter()
        .filter(|obs| obs.date < cutoff)
        .cloned()
        .collect()
}

/// Reward values of a window, in ascending-date order.
pub fn values(series: &[Observation]) -> Vec<f64> {
    series.iter().map(|obs| obs.reward_per_unit).collect()
}

/// Date labels of a window, in ascending order.
pub fn labels(series: &[Observation]) -> Vec<NaiveDate> {
    series.iter().map(|obs| obs.date).collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, reward: f64) -> RawRecord {
        RawRecord {
            date: Some(date.to_string()),
            reward_per_token: Some(reward),
        }
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn normalize_sorts_ascending_and_drops_malformed() {
        let records = vec![
            rec("2025-03-03", 3.0),
            RawRecord {
                date: None,
                reward_per_token: Some(9.0),
            },
            rec("2025-03-01", 1.0),
            RawRecord {
                date: Some("not-a-date".to_string()),
                reward_per_token: Some(9.0),
            },
            RawRecord {
                date: Some("2025-03-02".to_string()),
                reward_per_token: Some(f64::NAN),
            },
            rec("2025-03-02", 2.0),
        ];

        let (series, dropped) = normalize_counted(&records);
        assert_eq!(dropped, 3);
        let dates: Vec<NaiveDate> = series.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![d("2025-03-01"), d("2025-03-02"), d("2025-03-03")]
        );
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn normalize_keeps_input_order_for_equal_dates() {
        let records = vec![rec("2025-03-01", 1.0), rec("2025-03-01", 2.0)];
        let series = normalize(&records);
        assert_eq!(series[0].reward_per_unit, 1.0);
        assert_eq!(series[1].reward_per_unit, 2.0);
    }

    #[test]
    fn window_for_30d_keeps_only_recent_observations() {
        // A series spanning more than a year.
        let mut records = Vec::new();
        let today = d("2025-06-30");
        for i in 0..400 {
            let date = today - chrono::Duration::days(i);
            records.push(rec(&date.to_string(), i as f64));
        }
        let series = normalize(&records);

        let window = window_for(&series, WindowToken::D30, today);
        let cutoff = today - chrono::Duration::days(30);
        assert_eq!(window.len(), 31);
        assert!(window.iter().all(|obs| obs.date >= cutoff));

        let all = window_for(&series, WindowToken::All, today);
        assert_eq!(all, series);
    }

    #[test]
    fn window_between_is_inclusive_and_tolerates_bad_bounds() {
        let series = normalize(&[
            rec("2025-03-01", 1.0),
            rec("2025-03-02", 2.0),
            rec("2025-03-03", 3.0),
        ]);

        let mid = window_between(&series, Some("2025-03-02"), Some("2025-03-03"));
        assert_eq!(mid.len(), 2);
        assert_eq!(mid[0].date, d("2025-03-02"));

        // Malformed bounds act as "no bound".
        let open = window_between(&series, Some("garbage"), None);
        assert_eq!(open.len(), 3);

        let until = window_between(&series, None, Some("2025-03-01"));
        assert_eq!(until.len(), 1);
    }

    #[test]
    fn before_excludes_the_cutoff_date() {
        let series = normalize(&[
            rec("2025-03-01", 1.0),
            rec("2025-03-02", 2.0),
            rec("2025-03-03", 3.0),
        ]);
        let prior = before(&series, d("2025-03-03"));
        assert_eq!(prior.len(), 2);
        assert!(prior.iter().all(|obs| obs.date < d("2025-03-03")));
    }
}
