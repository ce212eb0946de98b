//! Rolling and streak analysis.

use chrono::NaiveDate;

use crate::domain::BestWindow;
use crate::stats::describe::mean;

const STREAK_LEN: usize = 7;

/// Best contiguous 7-day average window.
///
/// Slides a fixed window with a running sum (add incoming, subtract
/// outgoing), so the whole scan is O(n). The reported `start` is the label
/// of the first day of the winning window; ties keep the earliest window
/// (strict `>` when updating the best). Fewer than 7 values yields the
/// `{avg: 0, start: None}` sentinel.
pub fn best_seven_day_window(values: &[f64], labels: &[NaiveDate]) -> BestWindow {
    if values.len() < STREAK_LEN {
        return BestWindow {
            avg: 0.0,
            start: None,
        };
    }

    let mut best = f64::NEG_INFINITY;
    let mut best_start = 0usize;
    let mut sum = 0.0;

    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= STREAK_LEN {
            sum -= values[i - STREAK_LEN];
        }
        if i >= STREAK_LEN - 1 {
            let avg = sum / STREAK_LEN as f64;
            if avg > best {
                best = avg;
                best_start = i - (STREAK_LEN - 1);
            }
        }
    }

    BestWindow {
        avg: best,
        start: labels.get(best_start).copied(),
    }
}

/// Mean of the most recent `min(7, n)` values.
///
/// Partial windows are allowed at the start of a series; empty input
/// returns `0.0`.
pub fn trailing_seven_day_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let k = STREAK_LEN.min(values.len());
    mean(&values[values.len() - k..])
}
