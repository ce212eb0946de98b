//! Trend fitting and naive forecasting.

use chrono::NaiveDate;

use crate::domain::Forecast;

/// Ordinary least squares of value against 0-based index.
///
/// Non-finite values are skipped when accumulating the sums, but `n` stays
/// the input length so the output lines up with the input positions. When no
/// line can be fit (fewer than 2 points, or zero index variance) the result
/// is all-`None` of the same length; callers must treat `None` as "no
/// datum", not zero.
pub fn trendline(values: &[f64]) -> Vec<Option<f64>> {
    let n = values.len();
    if n < 2 {
        return vec![None; n];
    }

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        if !y.is_finite() {
            continue;
        }
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let n_f = n as f64;
    let denom = n_f * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return vec![None; n];
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n_f;

    (0..n).map(|i| Some(slope * i as f64 + intercept)).collect()
}

/// Naive rolling-mean forecast.
///
/// Seeds a buffer with the last `window` values, then repeatedly appends the
/// buffer mean as the next forecast and rolls the buffer forward over its own
/// output. The feedback loop (forecasts feeding later forecasts) is the
/// intended behavior, not a bug: the prediction compounds toward the window
/// mean instead of repeating a flat average.
///
/// `last_date` is the final real observation date; forecast day `i` is
/// labeled `last_date + i`. An empty source window yields an empty forecast.
pub fn forecast_next_days(
    values: &[f64],
    last_date: NaiveDate,
    days: usize,
    window: usize,
) -> Forecast {
    let start = values.len().saturating_sub(window);
    let mut rolling: Vec<f64> = values[start..].to_vec();
    if rolling.is_empty() {
        return Forecast::default();
    }

    let mut out = Forecast {
        labels: Vec::with_capacity(days),
        values: Vec::with_capacity(days),
    };
    for i in 0..days {
        let mean = rolling.iter().sum::<f64>() / rolling.len() as f64;
        out.values.push(mean);
        out.labels
            .push(last_date + chrono::Duration::days(i as i64 + 1));
        rolling.remove(0);
        rolling.push(mean);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn degenerate_inputs_return_all_none() {
        assert_eq!(trendline(&[]), Vec::<Option<f64>>::new());
        assert_eq!(trendline(&[5.0]), vec![None]);
    }

    #[test]
    fn fits_a_perfect_line_exactly() {
        // y = 2 + 3x
        let fitted = trendline(&[2.0, 5.0, 8.0, 11.0]);
        for (i, v) in fitted.iter().enumerate() {
            let expected = 2.0 + 3.0 * i as f64;
            assert!((v.unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn skips_non_finite_values_but_keeps_length() {
        let fitted = trendline(&[1.0, f64::NAN, 3.0]);
        assert_eq!(fitted.len(), 3);
        assert!(fitted.iter().all(|v| v.is_some()));
    }

    #[test]
    fn flat_series_forecasts_itself() {
        let f = forecast_next_days(&[10.0, 10.0, 10.0], d("2025-01-03"), 3, 30);
        assert_eq!(f.values, vec![10.0, 10.0, 10.0]);
        assert_eq!(
            f.labels,
            vec![d("2025-01-04"), d("2025-01-05"), d("2025-01-06")]
        );
    }

    #[test]
    fn forecast_feeds_on_its_own_output() {
        // Buffer [0, 10]: mean 5 -> buffer [10, 5]: mean 7.5 -> buffer [5, 7.5]: mean 6.25
        let f = forecast_next_days(&[0.0, 10.0], d("2025-01-02"), 3, 2);
        assert_eq!(f.values, vec![5.0, 7.5, 6.25]);
    }

    #[test]
    fn empty_source_yields_empty_forecast() {
        let f = forecast_next_days(&[], d("2025-01-01"), 7, 30);
        assert!(f.values.is_empty());
        assert!(f.labels.is_empty());
    }
}
