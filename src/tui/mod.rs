//! Ratatui-based terminal UI.
//!
//! The TUI shows the daily reward chart with optional trendline/forecast
//! overlays, plus the window statistics panel. Window switching re-slices the
//! already-fetched history; only an explicit refresh hits the remote store.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{self, RunOutput};
use crate::data::{FirestoreClient, generate_rewards};
use crate::domain::{CompareBase, RawRecord, RunConfig, WindowToken};
use crate::error::AppError;
use crate::report::format::fmt;
use crate::series;

mod plotters_chart;

use plotters_chart::RewardChart;

/// Days the forecast overlay projects past the window.
const FORECAST_DAYS: usize = 7;

/// Start the TUI.
pub fn run(config: RunConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::data(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::data(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::data(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: RunConfig,
    records: Vec<RawRecord>,
    run: Option<RunOutput>,
    show_trend: bool,
    show_forecast: bool,
    cumulative: bool,
    status: String,
}

impl App {
    fn new(config: RunConfig) -> Result<Self, AppError> {
        let mut app = Self {
            config,
            records: Vec::new(),
            run: None,
            show_trend: true,
            show_forecast: false,
            cumulative: false,
            status: "Loading reward history...".to_string(),
        };
        app.reload()?;
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::data(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::data(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::data(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('7') => self.set_window(WindowToken::D7),
            KeyCode::Char('3') => self.set_window(WindowToken::D30),
            KeyCode::Char('9') => self.set_window(WindowToken::D90),
            KeyCode::Char('y') => self.set_window(WindowToken::Y1),
            KeyCode::Char('a') => self.set_window(WindowToken::All),
            KeyCode::Char('t') => {
                self.show_trend = !self.show_trend;
                self.status = format!("trendline: {}", on_off(self.show_trend));
            }
            KeyCode::Char('f') => {
                self.show_forecast = !self.show_forecast;
                self.status = format!("forecast: {}", on_off(self.show_forecast));
            }
            KeyCode::Char('c') => {
                self.cumulative = !self.cumulative;
                self.status = if self.cumulative {
                    "chart: cumulative total".to_string()
                } else {
                    "chart: daily rewards".to_string()
                };
            }
            KeyCode::Char('b') => {
                self.config.compare = next_compare(self.config.compare);
                self.rewindow();
                self.status = format!("compare: {}", self.config.compare.display_name());
            }
            KeyCode::Char('r') => {
                if self.config.offline {
                    self.config.sample_seed = self.config.sample_seed.wrapping_add(1);
                }
                self.reload()?;
            }
            _ => {}
        }

        Ok(false)
    }

    fn set_window(&mut self, token: WindowToken) {
        self.config.window = token;
        // Window keys always return to relative windows.
        self.config.since = None;
        self.config.until = None;
        self.rewindow();
        self.status = format!("window: {}", token.display_name());
    }

    fn reload(&mut self) -> Result<(), AppError> {
        self.records = if self.config.offline {
            self.status = format!("Resampled series (seed {}).", self.config.sample_seed);
            generate_rewards(
                self.config.sample_days,
                self.config.sample_seed,
                self.config.asof,
            )
        } else {
            self.status = "Fetching reward history...".to_string();
            let records = FirestoreClient::from_env()?.fetch_rewards()?;
            self.status = format!("Fetched {} records.", records.len());
            records
        };
        self.rewindow();
        Ok(())
    }

    fn rewindow(&mut self) {
        self.run = Some(pipeline::run_stats_with_records(
            &self.config,
            &self.records,
        ));
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("zyp", Style::default().fg(Color::Cyan)),
            Span::raw(" — Zyptopia daily reward tracker"),
        ]));

        let (n, dropped) = self
            .run
            .as_ref()
            .map(|r| (r.report.n_days, r.dropped))
            .unwrap_or((0, 0));

        lines.push(Line::from(Span::styled(
            format!(
                "window: {} | as-of: {} | compare: {} | n={n} | dropped={dropped} | source: {}",
                self.config.window.display_name(),
                self.config.asof,
                self.config.compare.display_name(),
                if self.config.offline {
                    "sample"
                } else {
                    "remote"
                },
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(38)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_stats(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = if self.cumulative {
            "Cumulative rewards"
        } else {
            "Daily rewards (per 1M tokens)"
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };
        if run.window.is_empty() {
            let msg = Paragraph::new("No observations in this window.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let (daily, trend, forecast, x_bounds, y_bounds) = chart_series(
            run,
            self.cumulative,
            self.show_trend,
            self.show_forecast,
        );

        let (chart_rect, insets) = chart_layout(inner);
        let widget = RewardChart {
            daily: &daily,
            trend: &trend,
            forecast: &forecast,
            x_bounds,
            y_bounds,
            x_label: "day",
            y_label: if self.cumulative {
                "total".to_string()
            } else {
                "reward/1M".to_string()
            },
            fmt_x: fmt_axis_x,
            fmt_y: fmt_axis_y,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds);
        }
    }

    fn draw_stats(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(run) = &self.run else {
            return;
        };
        let report = &run.report;

        let delta = match report.delta_pct {
            Some(d) => format!("{}{}%", if d >= 0.0 { "+" } else { "" }, fmt(d, 1)),
            None => "-".to_string(),
        };
        let best7 = match report.best7.start {
            Some(start) => format!("{} from {start}", fmt(report.best7.avg, 2)),
            None => "-".to_string(),
        };
        let best_day = report
            .best_day
            .map(|(v, d)| format!("{} on {d}", fmt(v, 2)))
            .unwrap_or_else(|| "-".to_string());

        let items = vec![
            ListItem::new(format!("Avg/day      {}", fmt(report.avg, 2))),
            ListItem::new(format!("vs prior     {delta}")),
            ListItem::new(format!("Median       {}", fmt(report.median, 2))),
            ListItem::new(format!(
                "P25 / P75    {} / {}",
                fmt(report.p25, 2),
                fmt(report.p75, 2)
            )),
            ListItem::new(format!("Total        {}", fmt(report.total, 0))),
            ListItem::new(format!("Best day     {best_day}")),
            ListItem::new(format!("Best 7d      {best7}")),
            ListItem::new(format!("Rolling 7d   {}", fmt(report.trailing7, 2))),
            ListItem::new(format!(
                "Std dev      {} (CV {}%)",
                fmt(report.std_dev, 2),
                fmt(report.cv_pct, 1)
            )),
            ListItem::new(format!(
                "Above median {} ({}%)",
                report.days_above_median,
                fmt(report.days_above_median_pct, 1)
            )),
        ];

        let list =
            List::new(items).block(Block::default().title("Window stats").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "7/3/9/y/a window  t trend  f forecast  c cumulative  b compare  r refresh  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn on_off(v: bool) -> &'static str {
    if v { "on" } else { "off" }
}

fn next_compare(cur: CompareBase) -> CompareBase {
    match cur {
        CompareBase::PriorWindow => CompareBase::Prior7d,
        CompareBase::Prior7d => CompareBase::Prior30d,
        CompareBase::Prior30d => CompareBase::PriorWindow,
    }
}

/// Build chart series for Plotters: day-indexed points plus overlays.
fn chart_series(
    run: &RunOutput,
    cumulative: bool,
    show_trend: bool,
    show_forecast: bool,
) -> (
    Vec<(f64, f64)>,
    Vec<(f64, f64)>,
    Vec<(f64, f64)>,
    [f64; 2],
    [f64; 2],
) {
    let values = if cumulative {
        run.report.cumulative.clone()
    } else {
        series::values(&run.window)
    };

    let daily: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();

    let trend: Vec<(f64, f64)> = if show_trend && !cumulative {
        let raw = series::values(&run.window);
        crate::stats::trendline(&raw)
            .iter()
            .enumerate()
            .filter_map(|(i, y)| y.map(|y| (i as f64, y)))
            .collect()
    } else {
        Vec::new()
    };

    let forecast: Vec<(f64, f64)> = if show_forecast && !cumulative {
        let raw = series::values(&run.window);
        let last_date = run
            .window
            .last()
            .map(|obs| obs.date)
            .unwrap_or_default();
        let fc = crate::stats::forecast_next_days(&raw, last_date, FORECAST_DAYS, 30);
        fc.values
            .iter()
            .enumerate()
            .map(|(i, &v)| ((raw.len() + i) as f64, v))
            .collect()
    } else {
        Vec::new()
    };

    let x_max = daily
        .iter()
        .chain(&forecast)
        .map(|&(x, _)| x)
        .fold(1.0_f64, f64::max);
    let x_bounds = [0.0, x_max];

    let ys: Vec<f64> = daily
        .iter()
        .chain(&trend)
        .chain(&forecast)
        .map(|&(_, y)| y)
        .collect();
    let (y_min, y_max) = match (crate::stats::min_value(&ys), crate::stats::max_value(&ys)) {
        (Some(lo), Some(hi)) if hi > lo && lo.is_finite() && hi.is_finite() => (lo, hi),
        _ => (0.0, 1.0),
    };
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    (daily, trend, forecast, x_bounds, y_bounds)
}

fn fmt_axis_x(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_y(v: f64) -> String {
    format!("{v:.1}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{x_val:.0}");
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.0}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("day")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("reward/1M").style(
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD),
    );
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
