//! Command-line parsing for the daily reward analytics tool.
//!
//! Parsing stays here; dispatch and the actual work live in `app`. The
//! statistics code never sees clap types.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::analytics::EventRange;
use crate::domain::{CompareBase, DEFAULT_USD_PER_REWARD_UNIT, Scenario, WindowToken};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "zyp", version, about = "Zyptopia daily reward analytics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Window statistics: averages, percentiles, streaks, records.
    Stats(StatsArgs),
    /// Project earnings for a holding under a scenario rate.
    Project(ProjectArgs),
    /// Tokens needed to reach a target daily reward.
    Goal(GoalArgs),
    /// ROI and APY for a holding bought at a given price and date.
    Roi(RoiArgs),
    /// Naive rolling-mean forecast of the next days.
    Forecast(ForecastArgs),
    /// Aggregate mirrored website interaction events.
    Analytics(AnalyticsArgs),
    /// Launch the interactive TUI.
    ///
    /// Uses the same pipeline as `zyp stats`, rendered with Ratatui.
    Tui(StatsArgs),
}

/// Options shared by every reward-series command.
#[derive(Debug, Parser, Clone)]
pub struct CommonArgs {
    /// Lookback window over the reward history.
    #[arg(short = 'w', long, value_enum, default_value_t = WindowToken::D30)]
    pub window: WindowToken,

    /// Explicit range start (YYYY-MM-DD, inclusive). Overrides --window.
    #[arg(long, value_name = "DATE")]
    pub since: Option<String>,

    /// Explicit range end (YYYY-MM-DD, inclusive). Overrides --window.
    #[arg(long, value_name = "DATE")]
    pub until: Option<String>,

    /// Treat this date as "today" (defaults to the local date).
    #[arg(long, value_name = "DATE")]
    pub asof: Option<NaiveDate>,

    /// Baseline for the "vs prior" delta on the average.
    #[arg(long, value_enum, default_value_t = CompareBase::PriorWindow)]
    pub compare: CompareBase,

    /// Use a deterministic synthetic series instead of the remote store.
    #[arg(long)]
    pub offline: bool,

    /// Random seed for the synthetic series.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Length of the synthetic series in days.
    #[arg(long, default_value_t = 180)]
    pub sample_days: usize,

    /// USD value of one reward unit.
    #[arg(long = "usd-rate", default_value_t = DEFAULT_USD_PER_REWARD_UNIT)]
    pub usd_per_reward_unit: f64,
}

#[derive(Debug, Parser, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Render an ASCII chart under the stats (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Parser)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Holding size in tokens.
    #[arg(long, default_value_t = 1_000_000.0)]
    pub holdings: f64,

    /// Rate scenario derived from the window's distribution.
    #[arg(long, value_enum, default_value_t = Scenario::Base)]
    pub scenario: Scenario,

    /// Also report days until this cumulative USD milestone.
    #[arg(long, value_name = "USD")]
    pub target_usd: Option<f64>,
}

#[derive(Debug, Parser)]
pub struct GoalArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Desired daily reward in reward units.
    #[arg(long)]
    pub daily: f64,

    /// Per-million daily rate to assume (defaults to the recent average).
    #[arg(long)]
    pub rate: Option<f64>,
}

#[derive(Debug, Parser)]
pub struct RoiArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Holding size in tokens.
    #[arg(long)]
    pub holdings: f64,

    /// Average buy price per token, in USD.
    #[arg(long)]
    pub avg_buy_price: f64,

    /// Date the position was opened (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub start_date: NaiveDate,
}

#[derive(Debug, Parser)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Days to project forward.
    #[arg(long, default_value_t = 7)]
    pub days: usize,

    /// Rolling-mean buffer length.
    #[arg(long, default_value_t = 30)]
    pub lookback: usize,
}

#[derive(Debug, Parser)]
pub struct AnalyticsArgs {
    /// Lookback range in days over the event batch.
    #[arg(long, value_enum, default_value_t = EventRange::Days30)]
    pub range: EventRange,

    /// Only count events with this exact name.
    #[arg(long, value_name = "NAME")]
    pub event: Option<String>,

    /// CTA placement substring filter.
    #[arg(long)]
    pub placement: Option<String>,

    /// Free-text filter across event names and params.
    #[arg(long)]
    pub query: Option<String>,

    /// Treat this date as "now" for the range cutoff.
    #[arg(long, value_name = "DATE")]
    pub asof: Option<NaiveDate>,

    /// Use a deterministic synthetic event batch instead of the remote store.
    #[arg(long)]
    pub offline: bool,

    /// Random seed for the synthetic events.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
