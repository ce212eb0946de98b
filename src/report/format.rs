//! Plain-text formatting of computed results for terminal output.

use crate::analytics::EventTotals;
use crate::calc;
use crate::domain::{CompareBase, Forecast, Projection, RoiSummary, RunConfig, Scenario};
use crate::report::WindowReport;

/// Format the stats screen: key stats, breakdown table, records.
pub fn format_window_report(report: &WindowReport, config: &RunConfig, dropped: usize) -> String {
    let mut out = String::new();

    out.push_str("=== zyp - Daily Reward Stats ===\n");
    let scope = match (&config.since, &config.until) {
        (None, None) => report.window.display_name().to_string(),
        (since, until) => format!(
            "{}..{}",
            since.as_deref().unwrap_or("start"),
            until.as_deref().unwrap_or("today"),
        ),
    };
    out.push_str(&format!(
        "Window: {} | As-of: {} | n={} day{}\n",
        scope,
        config.asof,
        report.n_days,
        if report.n_days == 1 { "" } else { "s" },
    ));
    if dropped > 0 {
        out.push_str(&format!("({dropped} malformed records skipped)\n"));
    }

    out.push_str("\nKey stats (per 1M tokens):\n");
    out.push_str(&row("Avg/day", fmt(report.avg, 2), delta_note(report, config.compare)));
    out.push_str(&row(
        "Total (window)",
        fmt(report.total, 0),
        format!("{} days", report.n_days),
    ));
    out.push_str(&row(
        "Best day",
        fmt_opt_day(report.best_day),
        String::new(),
    ));
    out.push_str(&row(
        "Best 7-day streak",
        fmt(report.best7.avg, 2),
        report
            .best7
            .start
            .map(|d| format!("starting {d}"))
            .unwrap_or_else(|| "-".to_string()),
    ));
    out.push_str(&row("Median/day", fmt(report.median, 2), String::new()));
    out.push_str(&row(
        "P25 / P75",
        format!("{} / {}", fmt(report.p25, 2), fmt(report.p75, 2)),
        "interquartile range".to_string(),
    ));

    out.push_str("\nBreakdown:\n");
    out.push_str(&row(
        "Quietest day",
        fmt_opt_day(report.quietest_day),
        String::new(),
    ));
    out.push_str(&row(
        "Rolling 7-day avg",
        fmt(report.trailing7, 2),
        format!("last {} days", report.n_days.min(7)),
    ));
    out.push_str(&row(
        "Days above median",
        report.days_above_median.to_string(),
        format!("{}% of window", fmt(report.days_above_median_pct, 1)),
    ));
    out.push_str(&row(
        "Std dev",
        fmt(report.std_dev, 2),
        format!("volatility - CV {}%", fmt(report.cv_pct, 1)),
    ));

    if !report.top3.is_empty() {
        out.push_str("\nRecords (top days in window):\n");
        for (v, d) in &report.top3 {
            out.push_str(&format!("  {} on {d}\n", fmt(*v, 2)));
        }
    }

    out
}

/// Format a scenario projection for a holding.
pub fn format_projection(
    scenario: Scenario,
    rate: f64,
    holdings: f64,
    projection: &Projection,
    target_usd: Option<f64>,
) -> String {
    let mut out = String::new();
    out.push_str("=== zyp - Earnings Projection ===\n");
    out.push_str(&format!(
        "Scenario: {} | rate {}/day per 1M | holdings {}\n\n",
        scenario.display_name(),
        fmt(rate, 2),
        fmt(holdings, 0),
    ));
    out.push_str(&row("Daily reward", fmt(projection.daily_reward, 2), String::new()));
    out.push_str(&row("Yearly reward", fmt(projection.yearly_reward, 2), String::new()));
    out.push_str(&row("Daily USD", format!("${}", fmt(projection.daily_usd, 4)), String::new()));
    out.push_str(&row("Yearly USD", format!("${}", fmt(projection.yearly_usd, 2)), String::new()));

    if let Some(target) = target_usd {
        let note = match calc::days_to_milestone(projection.daily_usd, target) {
            Some(days) => format!("{days} days"),
            None => "unreachable at this rate".to_string(),
        };
        out.push_str(&row(format!("${} milestone", fmt(target, 0)), note, String::new()));
    }

    out
}

/// Format the goal-seeking answer.
pub fn format_goal(rate: f64, desired_daily: f64, tokens_needed: f64) -> String {
    let mut out = String::new();
    out.push_str("=== zyp - Goal Seek ===\n");
    out.push_str(&format!(
        "Target: {} reward units/day at rate {}/day per 1M\n\n",
        fmt(desired_daily, 2),
        fmt(rate, 2),
    ));
    if tokens_needed > 0.0 {
        out.push_str(&row(
            "Tokens needed",
            fmt(tokens_needed, 0),
            "rounded up to 100k".to_string(),
        ));
    } else {
        out.push_str("No rate observed in this window; goal cannot be computed.\n");
    }
    out
}

/// Format the ROI/APY answer.
pub fn format_roi(summary: &RoiSummary) -> String {
    let mut out = String::new();
    out.push_str("=== zyp - ROI & APY ===\n\n");
    out.push_str(&row("Days held", summary.days_held.to_string(), String::new()));
    out.push_str(&row("Daily reward", fmt(summary.daily_reward, 2), String::new()));
    out.push_str(&row("Total USD earned", format!("${}", fmt(summary.total_usd, 2)), String::new()));
    out.push_str(&row("ROI", format!("{}%", fmt(summary.roi_pct, 2)), String::new()));
    out.push_str(&row("APY", format!("{}%", fmt(summary.apy_pct, 2)), String::new()));
    out
}

/// Format the forecast table.
pub fn format_forecast(forecast: &Forecast) -> String {
    let mut out = String::new();
    out.push_str("=== zyp - 7-day Forecast (rolling mean) ===\n\n");
    if forecast.values.is_empty() {
        out.push_str("No data in this window; nothing to forecast.\n");
        return out;
    }
    for (label, value) in forecast.labels.iter().zip(&forecast.values) {
        out.push_str(&format!("  {label}  {}\n", fmt(*value, 2)));
    }
    out
}

/// Format the analytics dashboard aggregates.
pub fn format_analytics(totals: &EventTotals) -> String {
    let mut out = String::new();
    out.push_str("=== zyp - Interaction Analytics ===\n");
    out.push_str(&format!(
        "{} events in view | {} page views | calc: full {} / inline {} | searches {}\n",
        totals.all, totals.page_views, totals.calc_used, totals.mini_calc_used, totals.searches,
    ));

    if !totals.page_views_by_day.is_empty() {
        let series: Vec<u64> = totals.page_views_by_day.values().copied().collect();
        out.push_str(&format!("Traffic: {}\n", sparkline(&series)));
    }

    if !totals.by_name.is_empty() {
        out.push_str("\nEvents by name:\n");
        for (name, n) in &totals.by_name {
            out.push_str(&format!("  {name:<24} {n}\n"));
        }
    }

    if !totals.cta_by_placement.is_empty() {
        out.push_str("\nCTA clicks by placement:\n");
        for (placement, n) in &totals.cta_by_placement {
            out.push_str(&format!("  {placement:<24} {n}\n"));
        }
    }

    if !totals.internal_nav.is_empty() {
        out.push_str("\nInternal navigation:\n");
        for (to, n) in &totals.internal_nav {
            out.push_str(&format!("  {to:<24} {n}\n"));
        }
    }

    out
}

fn delta_note(report: &WindowReport, compare: CompareBase) -> String {
    match report.delta_pct {
        Some(delta) => format!(
            "{}{}% vs {}",
            if delta >= 0.0 { "+" } else { "-" },
            fmt(delta.abs(), 1),
            compare.display_name(),
        ),
        None => "-".to_string(),
    }
}

fn fmt_opt_day(day: Option<(f64, chrono::NaiveDate)>) -> String {
    match day {
        Some((v, d)) => format!("{} on {d}", fmt(v, 2)),
        None => "-".to_string(),
    }
}

fn row(name: impl AsRef<str>, value: String, note: String) -> String {
    if note.is_empty() {
        format!("  {:<22} {value}\n", name.as_ref())
    } else {
        format!("  {:<22} {value:<24} {note}\n", name.as_ref())
    }
}

/// Thousands-separated number with up to `digits` decimals (trailing zeros
/// trimmed), mirroring the site's locale formatting closely enough for
/// terminal output.
pub fn fmt(n: f64, digits: usize) -> String {
    let rounded = format!("{n:.digits$}");
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i.to_string(), f.trim_end_matches('0').to_string()),
        None => (rounded, String::new()),
    };

    let negative = int_part.starts_with('-');
    let digits_only = int_part.trim_start_matches('-');
    let mut grouped = String::new();
    for (i, c) in digits_only.chars().enumerate() {
        if i > 0 && (digits_only.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(&frac_part);
    }
    out
}

/// Unicode sparkline of a count series (analytics traffic).
fn sparkline(values: &[u64]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let max = values.iter().copied().max().unwrap_or(0).max(1);
    values
        .iter()
        .map(|&v| BARS[((v * (BARS.len() as u64 - 1)) / max) as usize])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_groups_thousands_and_trims_zeros() {
        assert_eq!(fmt(1234567.0, 2), "1,234,567");
        assert_eq!(fmt(1234.5, 2), "1,234.5");
        assert_eq!(fmt(-9876.25, 2), "-9,876.25");
        assert_eq!(fmt(0.0, 2), "0");
    }

    #[test]
    fn sparkline_scales_to_max() {
        let s = sparkline(&[0, 7, 14]);
        assert_eq!(s.chars().count(), 3);
        assert!(s.ends_with('█'));
    }
}
