//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that
//! parses arguments, resolves the run configuration, drives the pipeline
//! and prints the results. The statistics modules never read the clock or
//! the environment; everything injected happens here.

use chrono::{Local, NaiveDate, TimeZone, Utc};
use clap::Parser;

use crate::analytics::{self, EventFilter};
use crate::calc;
use crate::cli::{
    AnalyticsArgs, Command, CommonArgs, ForecastArgs, GoalArgs, ProjectArgs, RoiArgs, StatsArgs,
};
use crate::data::{FirestoreClient, generate_events};
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::series;

pub mod pipeline;

/// Entry point for the `zyp` binary.
pub fn run() -> Result<(), AppError> {
    // We want `zyp` and `zyp -w 30d` to behave like `zyp tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Stats(args) => handle_stats(args),
        Command::Project(args) => handle_project(args),
        Command::Goal(args) => handle_goal(args),
        Command::Roi(args) => handle_roi(args),
        Command::Forecast(args) => handle_forecast(args),
        Command::Analytics(args) => handle_analytics(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_stats(args: StatsArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.common);
    let run = pipeline::run_stats(&config)?;

    println!(
        "{}",
        crate::report::format_window_report(&run.report, &config, run.dropped)
    );

    if args.plot && !args.no_plot && !run.window.is_empty() {
        let values = series::values(&run.window);
        let labels = series::labels(&run.window);
        let trend = crate::stats::trendline(&values);
        let chart = crate::plot::render_ascii_chart(
            &values,
            &labels,
            Some(run.report.avg),
            Some(&trend),
            args.width,
            args.height,
        );
        println!("{chart}");
    }

    Ok(())
}

fn handle_project(args: ProjectArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.common);
    let run = pipeline::run_stats(&config)?;

    let values = series::values(&run.window);
    let rate = calc::resolve_scenario_rate(&values, args.scenario);
    let projection = calc::project(rate, args.holdings, config.usd_per_reward_unit);

    println!(
        "{}",
        crate::report::format_projection(
            args.scenario,
            rate,
            args.holdings,
            &projection,
            args.target_usd,
        )
    );
    Ok(())
}

fn handle_goal(args: GoalArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.common);
    let run = pipeline::run_stats(&config)?;

    let rate = args
        .rate
        .unwrap_or_else(|| calc::recent_average(&series::values(&run.series)));
    let tokens = calc::tokens_needed_for_daily_rate(rate, args.daily);

    println!("{}", crate::report::format_goal(rate, args.daily, tokens));
    Ok(())
}

fn handle_roi(args: RoiArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.common);
    let run = pipeline::run_stats(&config)?;

    // Average rate over the holding period; fall back to the recent average
    // when the history does not reach back to the start date.
    let start = args.start_date.to_string();
    let until = config.asof.to_string();
    let held = series::window_between(&run.series, Some(start.as_str()), Some(until.as_str()));
    let rate = if held.is_empty() {
        calc::recent_average(&series::values(&run.series))
    } else {
        crate::stats::mean(&series::values(&held))
    };

    let summary = calc::roi_apy(
        args.holdings,
        args.avg_buy_price,
        args.start_date,
        config.asof,
        rate,
        config.usd_per_reward_unit,
    );

    println!("{}", crate::report::format_roi(&summary));
    Ok(())
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.common);
    let run = pipeline::run_stats(&config)?;

    let values = series::values(&run.window);
    let last_date = run
        .window
        .last()
        .map(|obs| obs.date)
        .unwrap_or(config.asof);
    let forecast = crate::stats::forecast_next_days(&values, last_date, args.days, args.lookback);

    println!("{}", crate::report::format_forecast(&forecast));
    Ok(())
}

fn handle_analytics(args: AnalyticsArgs) -> Result<(), AppError> {
    let now_millis = match args.asof {
        Some(date) => end_of_day_millis(date),
        None => Utc::now().timestamp_millis(),
    };

    let events = if args.offline {
        generate_events(2000, args.seed, now_millis)
    } else {
        FirestoreClient::from_env()?.fetch_events()?
    };

    let filter = EventFilter {
        name: args.event,
        placement: args.placement,
        query: args.query,
    };
    let totals = analytics::aggregate(&events, args.range, &filter, now_millis);

    println!("{}", crate::report::format_analytics(&totals));
    Ok(())
}

fn handle_tui(args: StatsArgs) -> Result<(), AppError> {
    crate::tui::run(run_config_from_args(&args.common))
}

pub fn run_config_from_args(args: &CommonArgs) -> RunConfig {
    RunConfig {
        asof: args.asof.unwrap_or_else(|| Local::now().date_naive()),
        window: args.window,
        since: args.since.clone(),
        until: args.until.clone(),
        compare: args.compare,
        offline: args.offline,
        sample_seed: args.seed,
        sample_days: args.sample_days,
        usd_per_reward_unit: args.usd_per_reward_unit,
    }
}

fn end_of_day_millis(date: NaiveDate) -> i64 {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    Utc.from_utc_datetime(&midnight).timestamp_millis() + 86_399_999
}

/// Rewrite argv so `zyp` defaults to `zyp tui`.
///
/// Rules:
/// - `zyp`                      -> `zyp tui`
/// - `zyp -w 30d ...`           -> `zyp tui -w 30d ...`
/// - `zyp --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "stats" | "project" | "goal" | "roi" | "forecast" | "analytics" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
