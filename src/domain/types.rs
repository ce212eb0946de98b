//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during statistics/projection runs
//! - exported or reloaded later for comparisons
//! - constructed freely in tests

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The reference holding size the community tracks rewards against.
///
/// All stored rates are "reward units per day per 1,000,000 reference tokens".
pub const REFERENCE_UNITS: f64 = 1_000_000.0;

/// Default USD conversion for one reward unit (1000 reward units = $1).
///
/// This is an external constant, not a market price; every function that
/// needs it takes it as a parameter so tests can substitute values.
pub const DEFAULT_USD_PER_REWARD_UNIT: f64 = 0.001;

/// Token amounts suggested to holders are rounded up to this granularity.
pub const TOKEN_ROUNDING: f64 = 100_000.0;

/// A raw document as it arrives from the remote store.
///
/// Both fields are optional and untrusted; the normalizer decides what
/// survives. Keeping this shape loose means a malformed document never
/// fails a fetch, it just gets dropped later.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: Option<String>,
    pub reward_per_token: Option<f64>,
}

/// A single daily reward observation, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar date of the observation.
    pub date: NaiveDate,
    /// Reward units earned that day per 1,000,000 reference tokens.
    pub reward_per_unit: f64,
}

/// Relative lookback window over the observation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum WindowToken {
    #[serde(rename = "7d")]
    #[value(name = "7d")]
    D7,
    #[serde(rename = "30d")]
    #[value(name = "30d")]
    D30,
    #[serde(rename = "90d")]
    #[value(name = "90d")]
    D90,
    #[serde(rename = "1y")]
    #[value(name = "1y")]
    Y1,
    #[serde(rename = "all")]
    #[value(name = "all")]
    All,
}

impl WindowToken {
    /// Lookback length in days; `None` means unbounded.
    pub fn days(self) -> Option<i64> {
        match self {
            WindowToken::D7 => Some(7),
            WindowToken::D30 => Some(30),
            WindowToken::D90 => Some(90),
            WindowToken::Y1 => Some(365),
            WindowToken::All => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            WindowToken::D7 => "7d",
            WindowToken::D30 => "30d",
            WindowToken::D90 => "90d",
            WindowToken::Y1 => "1y",
            WindowToken::All => "all",
        }
    }
}

/// Named transformation of a window's distribution into a single
/// projection rate. A closed set, not user-extensible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// `max(P25, mean * 0.85)` — floor against unusually weak quartiles.
    Conservative,
    /// Plain window mean.
    Base,
    /// 75th percentile.
    Optimistic,
    /// Hypothetical multiples of the optimistic rate (not statistically derived).
    X10,
    X100,
    X1000,
}

impl Scenario {
    pub fn display_name(self) -> &'static str {
        match self {
            Scenario::Conservative => "conservative",
            Scenario::Base => "base",
            Scenario::Optimistic => "optimistic",
            Scenario::X10 => "10x",
            Scenario::X100 => "100x",
            Scenario::X1000 => "1000x",
        }
    }
}

/// Baseline used when comparing the current window's average against the past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompareBase {
    /// Same number of days immediately before the current window.
    PriorWindow,
    /// The 7 observations immediately before the current window.
    Prior7d,
    /// The 30 observations immediately before the current window.
    Prior30d,
}

impl CompareBase {
    pub fn display_name(self) -> &'static str {
        match self {
            CompareBase::PriorWindow => "prior window",
            CompareBase::Prior7d => "prior 7d",
            CompareBase::Prior30d => "prior 30d",
        }
    }
}

/// Holder-specific earnings estimate derived from a per-million rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub daily_reward: f64,
    pub yearly_reward: f64,
    pub daily_usd: f64,
    pub yearly_usd: f64,
}

/// Best contiguous 7-day average window.
///
/// `start` is `None` when the series is too short to hold a full window.
#[derive(Debug, Clone, PartialEq)]
pub struct BestWindow {
    pub avg: f64,
    pub start: Option<NaiveDate>,
}

/// Forward projection of the series by the naive rolling-mean method.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forecast {
    pub labels: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

/// ROI & APY summary for a holding over a date range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiSummary {
    pub days_held: i64,
    pub daily_reward: f64,
    pub total_usd: f64,
    pub roi_pct: f64,
    pub apy_pct: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags (plus defaults). `asof` is the injected "today":
/// nothing below the CLI reads the wall clock.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub asof: NaiveDate,
    pub window: WindowToken,
    /// Explicit inclusive range bounds; when either is set they override
    /// `window`. Kept as raw strings because malformed bounds are treated
    /// as absent, not as errors.
    pub since: Option<String>,
    pub until: Option<String>,
    pub compare: CompareBase,

    /// Use the deterministic synthetic series instead of the remote store.
    pub offline: bool,
    pub sample_seed: u64,
    pub sample_days: usize,

    pub usd_per_reward_unit: f64,
}
