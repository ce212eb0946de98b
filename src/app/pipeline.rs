//! Shared stats pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch (or generate) -> normalize -> window -> report
//!
//! The CLI and the TUI then focus on presentation (printing vs widgets).

use crate::data::{FirestoreClient, generate_rewards};
use crate::domain::{Observation, RawRecord, RunConfig};
use crate::error::AppError;
use crate::report::{WindowReport, compute_report};
use crate::series;

/// All computed outputs of a single stats run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Full normalized history, ascending by date.
    pub series: Vec<Observation>,
    /// The selected window of the history.
    pub window: Vec<Observation>,
    pub report: WindowReport,
    /// Raw records dropped by normalization.
    pub dropped: usize,
}

/// Load records per the config and execute the stats pipeline.
pub fn run_stats(config: &RunConfig) -> Result<RunOutput, AppError> {
    let records = if config.offline {
        generate_rewards(config.sample_days, config.sample_seed, config.asof)
    } else {
        FirestoreClient::from_env()?.fetch_rewards()?
    };

    Ok(run_stats_with_records(config, &records))
}

/// Execute the stats pipeline with pre-fetched records.
///
/// Used by the TUI to re-window without re-fetching. Explicit `since`/`until`
/// bounds override the relative window; in that case the report carries no
/// prior-window baseline.
pub fn run_stats_with_records(config: &RunConfig, records: &[RawRecord]) -> RunOutput {
    let (full, dropped) = series::normalize_counted(records);

    let explicit_range = config.since.is_some() || config.until.is_some();
    let window = if explicit_range {
        series::window_between(&full, config.since.as_deref(), config.until.as_deref())
    } else {
        series::window_for(&full, config.window, config.asof)
    };

    let token = if explicit_range {
        // No relative cutoff exists, so baselines are suppressed.
        crate::domain::WindowToken::All
    } else {
        config.window
    };
    let report = compute_report(&full, &window, token, config.compare, config.asof);

    RunOutput {
        series: full,
        window,
        report,
        dropped,
    }
}
