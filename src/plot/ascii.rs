//! ASCII plotting of the daily reward series for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - daily observations: `o`
//! - window average: `=` row
//! - optional trendline: `-` overlay

use chrono::NaiveDate;

/// Render the reward series as a fixed-grid chart.
///
/// `trend` pairs with `values` index-for-index; `None` cells (degenerate
/// trendline) are simply not drawn. `avg` draws a full-width horizontal
/// marker at the window average. An empty series renders a one-line note
/// instead of an empty grid.
pub fn render_ascii_chart(
    values: &[f64],
    labels: &[NaiveDate],
    avg: Option<f64>,
    trend: Option<&[Option<f64>]>,
    width: usize,
    height: usize,
) -> String {
    if values.is_empty() {
        return "Chart: no observations in this window.\n".to_string();
    }

    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(values, trend).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Average line at the very bottom of the z-order.
    if let Some(avg) = avg.filter(|v| v.is_finite()) {
        let row = map_y(avg, y_min, y_max, height);
        for cell in &mut grid[row] {
            *cell = '=';
        }
    }

    // Trendline next so observations overlay it.
    if let Some(trend) = trend {
        for (i, cell) in trend.iter().enumerate() {
            if let Some(y) = cell {
                let x = map_x(i, values.len(), width);
                let row = map_y(*y, y_min, y_max, height);
                grid[row][x] = '-';
            }
        }
    }

    for (i, &v) in values.iter().enumerate() {
        let x = map_x(i, values.len(), width);
        let row = map_y(v, y_min, y_max, height);
        grid[row][x] = 'o';
    }

    let mut out = String::new();
    let span = match (labels.first(), labels.last()) {
        (Some(first), Some(last)) => format!("{first}..{last}"),
        _ => format!("{} days", values.len()),
    };
    out.push_str(&format!(
        "Chart: {span} | reward/day per 1M = [{y_min:.2}, {y_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn y_range(values: &[f64], trend: Option<&[Option<f64>]>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &v in values {
        min_y = min_y.min(v);
        max_y = max_y.max(v);
    }
    if let Some(trend) = trend {
        for y in trend.iter().flatten() {
            min_y = min_y.min(*y);
            max_y = max_y.max(*y);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    ((u * (width as f64 - 1.0)).round() as usize).min(width - 1)
}

/// Row 0 is the top of the grid, so the mapping flips.
fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    let row = ((1.0 - u) * (height as f64 - 1.0)).round() as usize;
    row.min(height - 1)
}
