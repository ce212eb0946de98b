//! Descriptive statistics over a window's reward values.
//!
//! Empty-input sentinels, applied consistently:
//! - `mean`, `median`, `percentile`, `std_dev`, `coefficient_of_variation`
//!   return `0.0`
//! - `min_value` / `max_value` return `None`

/// Arithmetic mean. Returns `0.0` for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Classic median on a value-sorted copy (date order is irrelevant here).
/// Returns `0.0` for empty input.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Nearest-rank percentile: sort ascending and select the value at
/// `clamp(ceil(p/100 * n) - 1, 0, n-1)`.
///
/// This deliberately matches the tracker's formula rather than a linear
/// interpolation method; derived numbers must reproduce the reference
/// output exactly. `p` is clamped to `[0, 100]`. Returns `0.0` for empty
/// input.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let p = p.clamp(0.0, 100.0);
    let n = sorted.len();
    let rank = (p / 100.0 * n as f64).ceil() as isize - 1;
    let idx = rank.clamp(0, n as isize - 1) as usize;
    sorted[idx]
}

/// Population standard deviation (divide by `n`, not `n - 1`).
/// Returns `0.0` for empty input.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation as a percentage (`std_dev / mean * 100`).
/// Returns `0.0` when the mean is zero (including empty input).
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m == 0.0 {
        return 0.0;
    }
    std_dev(values) / m * 100.0
}

/// Smallest value, or `None` for empty input.
pub fn min_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Largest value, or `None` for empty input.
pub fn max_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_use_zero_sentinels() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(median(&[]), 0.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(coefficient_of_variation(&[]), 0.0);
        assert_eq!(min_value(&[]), None);
        assert_eq!(max_value(&[]), None);
    }

    #[test]
    fn percentile_is_nearest_rank_not_interpolated() {
        let v = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&v, 25.0), 10.0);
        assert_eq!(percentile(&v, 75.0), 30.0);

        // ceil(0.75 * 4) - 1 = 2 -> third element.
        assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0], 75.0), 3.0);

        // Out-of-range p clamps rather than erroring.
        assert_eq!(percentile(&v, -10.0), 10.0);
        assert_eq!(percentile(&v, 250.0), 40.0);
    }

    #[test]
    fn percentile_sorts_a_copy() {
        let v = [40.0, 10.0, 30.0, 20.0];
        assert_eq!(percentile(&v, 25.0), 10.0);
        // input untouched
        assert_eq!(v[0], 40.0);
    }

    #[test]
    fn median_handles_even_and_odd_lengths() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn std_dev_is_population_not_sample() {
        // Population std dev of [2, 4] is 1.0 (sample would be sqrt(2)).
        assert!((std_dev(&[2.0, 4.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn coefficient_of_variation_guards_zero_mean() {
        assert_eq!(coefficient_of_variation(&[1.0, -1.0]), 0.0);
        let cv = coefficient_of_variation(&[2.0, 4.0]);
        assert!((cv - (1.0 / 3.0 * 100.0)).abs() < 1e-9);
    }
}
