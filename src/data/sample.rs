//! Deterministic synthetic data for offline runs.
//!
//! The reward series is a mean-reverting random walk around the long-run
//! community rate, with occasional promo-style spikes, plus a few
//! deliberately malformed records so the normalizer's drop path is
//! exercised end to end. Everything is seeded; the same (days, seed, today)
//! always yields the same records.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::analytics::EventRecord;
use crate::domain::RawRecord;

/// Long-run daily reward level per 1M tokens the walk reverts toward.
const BASE_RATE: f64 = 250.0;
const MIN_RATE: f64 = 40.0;
const MAX_RATE: f64 = 900.0;
/// Daily step size of the walk.
const STEP_SIGMA: f64 = 9.0;
/// Pull back toward [`BASE_RATE`] per day.
const REVERSION: f64 = 0.04;
/// Chance of a promo spike on any given day.
const SPIKE_PROB: f64 = 0.04;

/// Generate `days` of synthetic daily reward records ending at `today`.
pub fn generate_rewards(days: usize, seed: u64, today: NaiveDate) -> Vec<RawRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    // Unit sigma cannot fail Normal::new; fall back to a flat series if it
    // somehow does rather than failing an offline run.
    let normal = match Normal::new(0.0, 1.0) {
        Ok(n) => n,
        Err(_) => return flat_series(days, today),
    };

    let mut records = Vec::with_capacity(days);
    let mut level = BASE_RATE;

    for i in 0..days {
        let offset = (days - 1 - i) as i64;
        let date = today - Duration::days(offset);

        let z: f64 = normal.sample(&mut rng);
        level += STEP_SIGMA * z + REVERSION * (BASE_RATE - level);
        level = level.clamp(MIN_RATE, MAX_RATE);

        let mut rate = level;
        if rng.gen_bool(SPIKE_PROB) {
            rate *= rng.gen_range(1.5..3.0);
        }

        records.push(RawRecord {
            date: Some(date.to_string()),
            reward_per_token: Some((rate * 100.0).round() / 100.0),
        });
    }

    // A couple of broken documents, like the live store occasionally holds.
    if days >= 20 {
        records.push(RawRecord {
            date: Some("not-a-date".to_string()),
            reward_per_token: Some(123.0),
        });
        records.push(RawRecord {
            date: Some(today.to_string()),
            reward_per_token: None,
        });
    }

    records
}

fn flat_series(days: usize, today: NaiveDate) -> Vec<RawRecord> {
    (0..days)
        .map(|i| {
            let date = today - Duration::days((days - 1 - i) as i64);
            RawRecord {
                date: Some(date.to_string()),
                reward_per_token: Some(BASE_RATE),
            }
        })
        .collect()
}

const EVENT_NAMES: [&str; 6] = [
    "page_view",
    "cta_click",
    "internal_nav",
    "calculator_used",
    "mini_calc_used",
    "historical_search",
];
const PLACEMENTS: [&str; 4] = ["home_top", "stats_footer", "graph_footer", "calc_footer"];
const DESTINATIONS: [&str; 4] = ["/", "/calculator", "/historical", "/about"];
const PAGES: [&str; 4] = ["home", "stats", "calculator", "historical"];

/// Generate `count` synthetic interaction events spread over the last 90
/// days before `now_millis`.
pub fn generate_events(count: usize, seed: u64, now_millis: i64) -> Vec<EventRecord> {
    let mut rng = StdRng::seed_from_u64(seed ^ 0x9e37_79b9);
    let span_millis: i64 = 90 * 86_400_000;

    let mut events = Vec::with_capacity(count);
    for _ in 0..count {
        // Weight page views heaviest, like real traffic.
        let name = if rng.gen_bool(0.5) {
            "page_view"
        } else {
            EVENT_NAMES[rng.gen_range(1..EVENT_NAMES.len())]
        };

        let ts_millis = now_millis - rng.gen_range(0..span_millis);
        let mut params = std::collections::BTreeMap::new();
        match name {
            "page_view" => {
                params.insert(
                    "page".to_string(),
                    PAGES[rng.gen_range(0..PAGES.len())].to_string(),
                );
            }
            "cta_click" => {
                params.insert(
                    "placement".to_string(),
                    PLACEMENTS[rng.gen_range(0..PLACEMENTS.len())].to_string(),
                );
            }
            "internal_nav" => {
                params.insert(
                    "to".to_string(),
                    DESTINATIONS[rng.gen_range(0..DESTINATIONS.len())].to_string(),
                );
            }
            _ => {}
        }

        events.push(EventRecord {
            name: name.to_string(),
            ts_millis,
            params,
        });
    }

    events.sort_by_key(|e| e.ts_millis);
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn rewards_are_deterministic_per_seed() {
        let today = day("2025-06-30");
        let a = generate_rewards(60, 7, today);
        let b = generate_rewards(60, 7, today);
        let c = generate_rewards(60, 8, today);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.date, y.date);
            assert_eq!(x.reward_per_token, y.reward_per_token);
        }
        assert!(
            a.iter()
                .zip(&c)
                .any(|(x, y)| x.reward_per_token != y.reward_per_token)
        );
    }

    #[test]
    fn reward_dates_ascend_and_end_today() {
        let today = day("2025-06-30");
        let records = generate_rewards(10, 1, today);
        // Below the malformed-record threshold: all records are clean.
        assert_eq!(records.len(), 10);
        assert_eq!(records[9].date.as_deref(), Some("2025-06-30"));
        assert_eq!(records[0].date.as_deref(), Some("2025-06-21"));
    }

    #[test]
    fn long_series_includes_malformed_records() {
        let today = day("2025-06-30");
        let records = generate_rewards(30, 1, today);
        assert_eq!(records.len(), 32);
        assert!(records.iter().any(|r| r.reward_per_token.is_none()));
    }

    #[test]
    fn rates_stay_within_the_clamp_band() {
        let today = day("2025-06-30");
        for rec in generate_rewards(400, 99, today) {
            if let Some(rate) = rec.reward_per_token {
                assert!(rate >= MIN_RATE && rate <= MAX_RATE * 3.0, "rate {rate}");
            }
        }
    }

    #[test]
    fn events_are_sorted_and_within_range() {
        let now = 200i64 * 86_400_000;
        let events = generate_events(500, 3, now);
        assert_eq!(events.len(), 500);
        assert!(events.windows(2).all(|w| w[0].ts_millis <= w[1].ts_millis));
        assert!(events.iter().all(|e| e.ts_millis <= now));
        assert!(events.iter().any(|e| e.name == "page_view"));
        assert!(events.iter().any(|e| e.name == "cta_click"));
    }
}
