//! Firestore REST integration for the community-tracked collections.
//!
//! Two collections matter here:
//! - `rewards`: one document per day with `date` and `rewardPerToken`
//! - `events`: interaction events mirrored by the website
//!
//! Documents arrive as loosely typed field maps; this module coerces them
//! into [`RawRecord`] / [`EventRecord`] without failing the fetch on a bad
//! document — the normalizer and aggregator decide what survives.

use std::collections::BTreeMap;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::analytics::EventRecord;
use crate::domain::RawRecord;
use crate::error::AppError;

const BASE_URL: &str = "https://firestore.googleapis.com/v1/projects";
const PAGE_SIZE: usize = 300;
const REWARDS_LIMIT: usize = 10_000;
const EVENTS_LIMIT: usize = 4_000;

pub struct FirestoreClient {
    client: Client,
    project_id: String,
    api_key: Option<String>,
}

impl FirestoreClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let project_id = std::env::var("ZYPTOPIA_PROJECT_ID")
            .map_err(|_| AppError::config("Missing ZYPTOPIA_PROJECT_ID in environment (.env)."))?;
        let api_key = std::env::var("ZYPTOPIA_API_KEY").ok();
        Ok(Self {
            client: Client::new(),
            project_id,
            api_key,
        })
    }

    /// Fetch the full daily reward history as raw records.
    pub fn fetch_rewards(&self) -> Result<Vec<RawRecord>, AppError> {
        let docs = self.fetch_collection("rewards", REWARDS_LIMIT)?;
        Ok(docs.iter().map(reward_from_fields).collect())
    }

    /// Fetch the most recently mirrored interaction events.
    pub fn fetch_events(&self) -> Result<Vec<EventRecord>, AppError> {
        let docs = self.fetch_collection("events", EVENTS_LIMIT)?;
        Ok(docs.iter().map(event_from_fields).collect())
    }

    fn fetch_collection(
        &self,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<BTreeMap<String, Value>>, AppError> {
        let url = format!(
            "{BASE_URL}/{}/databases/(default)/documents/{collection}",
            self.project_id
        );

        let mut out = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self
                .client
                .get(&url)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(key) = &self.api_key {
                req = req.query(&[("key", key)]);
            }
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token)]);
            }

            let resp = req
                .send()
                .map_err(|e| AppError::data(format!("Firestore request failed: {e}")))?;

            if !resp.status().is_success() {
                return Err(AppError::data(format!(
                    "Firestore request for '{collection}' failed with status {}.",
                    resp.status()
                )));
            }

            let body: ListResponse = resp
                .json()
                .map_err(|e| AppError::data(format!("Failed to parse Firestore response: {e}")))?;

            for doc in body.documents {
                out.push(doc.fields);
                if out.len() >= limit {
                    return Ok(out);
                }
            }

            match body.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    fields: BTreeMap<String, Value>,
}

/// One Firestore typed value. Only the variants the tracked collections
/// actually use are modeled; anything else deserializes to all-`None` and is
/// treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
struct Value {
    #[serde(rename = "stringValue")]
    string_value: Option<String>,
    #[serde(rename = "doubleValue")]
    double_value: Option<f64>,
    #[serde(rename = "integerValue")]
    integer_value: Option<String>,
    #[serde(rename = "booleanValue")]
    boolean_value: Option<bool>,
    #[serde(rename = "timestampValue")]
    timestamp_value: Option<String>,
    #[serde(rename = "mapValue")]
    map_value: Option<MapValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MapValue {
    #[serde(default)]
    fields: BTreeMap<String, Value>,
}

fn reward_from_fields(fields: &BTreeMap<String, Value>) -> RawRecord {
    RawRecord {
        date: fields.get("date").and_then(|v| v.string_value.clone()),
        reward_per_token: fields.get("rewardPerToken").and_then(as_number),
    }
}

fn event_from_fields(fields: &BTreeMap<String, Value>) -> EventRecord {
    let name = fields
        .get("name")
        .and_then(|v| v.string_value.clone())
        .unwrap_or_default();

    let ts_millis = fields
        .get("ts")
        .and_then(|v| v.timestamp_value.as_deref())
        .and_then(|ts| chrono::DateTime::parse_from_rfc3339(ts).ok())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0);

    let params = fields
        .get("params")
        .and_then(|v| v.map_value.as_ref())
        .map(|m| {
            m.fields
                .iter()
                .filter_map(|(k, v)| as_text(v).map(|text| (k.clone(), text)))
                .collect()
        })
        .unwrap_or_default();

    EventRecord {
        name,
        ts_millis,
        params,
    }
}

/// Coerce a Firestore value to a finite number, tolerating the three
/// encodings the tracker has historically written (double, integer,
/// numeric string).
fn as_number(value: &Value) -> Option<f64> {
    if let Some(v) = value.double_value {
        return v.is_finite().then_some(v);
    }
    if let Some(raw) = &value.integer_value {
        return raw.parse::<f64>().ok().filter(|v| v.is_finite());
    }
    if let Some(raw) = &value.string_value {
        return raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    }
    None
}

/// Stringify a param value for the flat event map.
fn as_text(value: &Value) -> Option<String> {
    if let Some(s) = &value.string_value {
        return Some(s.clone());
    }
    if let Some(v) = value.double_value {
        return Some(v.to_string());
    }
    if let Some(raw) = &value.integer_value {
        return Some(raw.clone());
    }
    if let Some(b) = value.boolean_value {
        return Some(b.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(v: &str) -> Value {
        Value {
            string_value: Some(v.to_string()),
            ..Default::default()
        }
    }

    fn double(v: f64) -> Value {
        Value {
            double_value: Some(v),
            ..Default::default()
        }
    }

    fn integer(v: &str) -> Value {
        Value {
            integer_value: Some(v.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn reward_coercion_tolerates_all_numeric_encodings() {
        for value in [double(245.5), integer("245"), string("245.5")] {
            let fields = BTreeMap::from([
                ("date".to_string(), string("2025-03-01")),
                ("rewardPerToken".to_string(), value),
            ]);
            let rec = reward_from_fields(&fields);
            assert_eq!(rec.date.as_deref(), Some("2025-03-01"));
            assert!(rec.reward_per_token.unwrap() > 0.0);
        }
    }

    #[test]
    fn malformed_reward_becomes_a_droppable_record() {
        let fields = BTreeMap::from([
            ("date".to_string(), string("2025-03-01")),
            ("rewardPerToken".to_string(), string("n/a")),
        ]);
        let rec = reward_from_fields(&fields);
        assert_eq!(rec.reward_per_token, None);

        let nan = BTreeMap::from([("rewardPerToken".to_string(), double(f64::NAN))]);
        assert_eq!(reward_from_fields(&nan).reward_per_token, None);
    }

    #[test]
    fn event_extracts_name_timestamp_and_params() {
        let params = MapValue {
            fields: BTreeMap::from([("placement".to_string(), string("stats_footer"))]),
        };
        let fields = BTreeMap::from([
            ("name".to_string(), string("cta_click")),
            (
                "ts".to_string(),
                Value {
                    timestamp_value: Some("2025-03-01T12:00:00Z".to_string()),
                    ..Default::default()
                },
            ),
            (
                "params".to_string(),
                Value {
                    map_value: Some(params),
                    ..Default::default()
                },
            ),
        ]);

        let ev = event_from_fields(&fields);
        assert_eq!(ev.name, "cta_click");
        assert_eq!(ev.params["placement"], "stats_footer");
        assert!(ev.ts_millis > 0);
    }
}
