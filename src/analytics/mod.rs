//! Read-side aggregation of previously logged interaction events.
//!
//! Events are written elsewhere (the website mirrors them into the document
//! store); this module only summarizes a fetched batch for the admin
//! dashboard. Counters and groupings follow the site's analytics screen:
//! totals per event name, CTA clicks by placement, internal navigation by
//! destination, and page views per day.

use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One logged interaction event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    /// Event timestamp in milliseconds since the epoch.
    pub ts_millis: i64,
    /// Flat string parameters (placement, destination, page, ...).
    pub params: BTreeMap<String, String>,
}

/// Lookback range over the loaded event batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EventRange {
    #[value(name = "7")]
    Days7,
    #[value(name = "30")]
    Days30,
    #[value(name = "90")]
    Days90,
    #[value(name = "all")]
    All,
}

impl EventRange {
    fn days(self) -> Option<i64> {
        match self {
            EventRange::Days7 => Some(7),
            EventRange::Days30 => Some(30),
            EventRange::Days90 => Some(90),
            EventRange::All => None,
        }
    }
}

/// Filters applied before aggregation.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Only this event name (`None` = all).
    pub name: Option<String>,
    /// CTA placement substring (applies to `cta_click` events only).
    pub placement: Option<String>,
    /// Free-text query across name and params.
    pub query: Option<String>,
}

/// Aggregated counters for the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTotals {
    pub all: u64,
    pub by_name: BTreeMap<String, u64>,
    pub cta_by_placement: BTreeMap<String, u64>,
    pub internal_nav: BTreeMap<String, u64>,
    pub page_views: u64,
    pub page_views_by_day: BTreeMap<String, u64>,
    pub calc_used: u64,
    pub mini_calc_used: u64,
    pub searches: u64,
}

/// Aggregate a batch of events.
///
/// `now_millis` is injected so the range cutoff is reproducible in tests.
pub fn aggregate(
    events: &[EventRecord],
    range: EventRange,
    filter: &EventFilter,
    now_millis: i64,
) -> EventTotals {
    let cutoff = range.days().map(|d| now_millis - d * 86_400_000);

    let mut totals = EventTotals::default();
    for ev in events {
        if let Some(cutoff) = cutoff {
            if ev.ts_millis < cutoff {
                continue;
            }
        }
        if !matches_filter(ev, filter) {
            continue;
        }

        totals.all += 1;
        *totals.by_name.entry(ev.name.clone()).or_default() += 1;

        match ev.name.as_str() {
            "cta_click" => {
                let placement = ev
                    .params
                    .get("placement")
                    .cloned()
                    .unwrap_or_else(|| "(none)".to_string());
                *totals.cta_by_placement.entry(placement).or_default() += 1;
            }
            "internal_nav" => {
                let to = ev
                    .params
                    .get("to")
                    .cloned()
                    .unwrap_or_else(|| "(none)".to_string());
                *totals.internal_nav.entry(to).or_default() += 1;
            }
            "calculator_used" => totals.calc_used += 1,
            "mini_calc_used" => totals.mini_calc_used += 1,
            "historical_search" => totals.searches += 1,
            "page_view" => {
                totals.page_views += 1;
                let day = day_key(ev.ts_millis);
                *totals.page_views_by_day.entry(day).or_default() += 1;
            }
            _ => {}
        }
    }
    totals
}

fn matches_filter(ev: &EventRecord, filter: &EventFilter) -> bool {
    if let Some(name) = &filter.name {
        if &ev.name != name {
            return false;
        }
    }
    if let Some(placement) = &filter.placement {
        if ev.name == "cta_click" {
            let pl = ev.params.get("placement").map(String::as_str).unwrap_or("");
            if !pl.to_lowercase().contains(&placement.to_lowercase()) {
                return false;
            }
        }
    }
    if let Some(query) = &filter.query {
        let query = query.to_lowercase();
        let mut haystack = ev.name.to_lowercase();
        for (k, v) in &ev.params {
            haystack.push(' ');
            haystack.push_str(&k.to_lowercase());
            haystack.push(' ');
            haystack.push_str(&v.to_lowercase());
        }
        if !haystack.contains(&query) {
            return false;
        }
    }
    true
}

/// `YYYY-MM-DD` key for a millisecond timestamp (UTC).
fn day_key(ts_millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ts_millis)
        .map(|dt| dt.date_naive().to_string())
        .unwrap_or_else(|| "(invalid)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(name: &str, ts_millis: i64, params: &[(&str, &str)]) -> EventRecord {
        EventRecord {
            name: name.to_string(),
            ts_millis,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    const DAY: i64 = 86_400_000;

    #[test]
    fn aggregates_counts_per_name_and_placement() {
        let now = 100 * DAY;
        let events = vec![
            ev("page_view", now - DAY, &[("page", "home")]),
            ev("page_view", now - DAY, &[("page", "stats")]),
            ev("cta_click", now - 2 * DAY, &[("placement", "stats_footer")]),
            ev("cta_click", now - 2 * DAY, &[("placement", "graph_footer")]),
            ev("cta_click", now - 2 * DAY, &[("placement", "stats_footer")]),
            ev("internal_nav", now - 3 * DAY, &[("to", "/calculator")]),
            ev("mini_calc_used", now - 3 * DAY, &[]),
        ];

        let totals = aggregate(&events, EventRange::All, &EventFilter::default(), now);
        assert_eq!(totals.all, 7);
        assert_eq!(totals.page_views, 2);
        assert_eq!(totals.by_name["cta_click"], 3);
        assert_eq!(totals.cta_by_placement["stats_footer"], 2);
        assert_eq!(totals.internal_nav["/calculator"], 1);
        assert_eq!(totals.mini_calc_used, 1);
    }

    #[test]
    fn range_cutoff_excludes_old_events() {
        let now = 100 * DAY;
        let events = vec![
            ev("page_view", now - DAY, &[]),
            ev("page_view", now - 40 * DAY, &[]),
        ];
        let totals = aggregate(&events, EventRange::Days30, &EventFilter::default(), now);
        assert_eq!(totals.all, 1);
        assert_eq!(totals.page_views, 1);
    }

    #[test]
    fn filters_narrow_the_view() {
        let now = 100 * DAY;
        let events = vec![
            ev("cta_click", now, &[("placement", "home_top_download")]),
            ev("cta_click", now, &[("placement", "calc_footer")]),
            ev("page_view", now, &[("page", "home")]),
        ];

        let by_name = aggregate(
            &events,
            EventRange::All,
            &EventFilter {
                name: Some("cta_click".to_string()),
                ..Default::default()
            },
            now,
        );
        assert_eq!(by_name.all, 2);

        let by_placement = aggregate(
            &events,
            EventRange::All,
            &EventFilter {
                placement: Some("calc".to_string()),
                ..Default::default()
            },
            now,
        );
        // Non-CTA events are unaffected by the placement filter.
        assert_eq!(by_placement.all, 2);
        assert_eq!(by_placement.cta_by_placement.len(), 1);

        let by_query = aggregate(
            &events,
            EventRange::All,
            &EventFilter {
                query: Some("home".to_string()),
                ..Default::default()
            },
            now,
        );
        assert_eq!(by_query.all, 2);
    }

    #[test]
    fn page_views_group_by_day() {
        let now = 100 * DAY;
        let events = vec![
            ev("page_view", now - DAY, &[]),
            ev("page_view", now - DAY + 1000, &[]),
            ev("page_view", now - 2 * DAY, &[]),
        ];
        let totals = aggregate(&events, EventRange::All, &EventFilter::default(), now);
        assert_eq!(totals.page_views_by_day.len(), 2);
        assert_eq!(totals.page_views_by_day.values().sum::<u64>(), 3);
    }
}
