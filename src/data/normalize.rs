//! Payload normalization.
//!
//! The dashboard reads ice data from several places: the raw ERDDAP table,
//! the proxy's reshaped history document, or a local JSON file. All of them
//! funnel through [`normalize_payload`], which produces a time-ordered list of
//! clamped [`Observation`]s and never fails on malformed input.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use super::observation::{Lake, Observation};
use crate::noaa::table::extract_rows;

/// Naive timestamp layouts accepted after RFC 3339 fails. Interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Clamp a percentage into `0..=100`. Non-finite values are dropped.
pub fn clamp_percent(value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value.clamp(0.0, 100.0))
    } else {
        None
    }
}

/// Read a JSON value as a finite float.
///
/// Accepts numbers and numeric strings; everything else is `None`.
pub fn to_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Parse an upstream timestamp.
pub fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Build an observation from a row keyed by column name.
///
/// Returns `None` when the row has no parseable `time`.
pub fn observation_from_row(row: &Map<String, Value>) -> Option<Observation> {
    let time = row.get("time").and_then(Value::as_str).and_then(parse_time)?;

    let mut observation = Observation::new(time);
    for lake in Lake::ALL {
        observation.set(lake, row.get(lake.column()).and_then(to_number));
    }
    Some(observation)
}

/// Normalize any supported payload shape into time-ordered observations.
///
/// Supported shapes: an ERDDAP `table` document, an object with a `rows`
/// array of row objects, a bare array of row objects, or a single row object.
/// Duplicate timestamps keep the row that appeared last.
pub fn normalize_payload(payload: &Value) -> Vec<Observation> {
    let rows: Vec<Map<String, Value>> = match payload {
        Value::Object(object) if object.contains_key("table") => extract_rows(payload),
        Value::Object(object) => match object.get("rows") {
            Some(Value::Array(rows)) => object_rows(rows),
            _ if object.contains_key("time") => vec![object.clone()],
            _ => Vec::new(),
        },
        Value::Array(rows) => object_rows(rows),
        _ => Vec::new(),
    };

    let mut observations: Vec<Observation> = rows.iter().filter_map(observation_from_row).collect();

    // Stable sort keeps input order among equal timestamps, so the last
    // duplicate is the one to keep.
    observations.sort_by_key(|o| o.time);
    let mut deduped: Vec<Observation> = Vec::with_capacity(observations.len());
    for observation in observations {
        match deduped.last_mut() {
            Some(last) if last.time == observation.time => *last = observation,
            _ => deduped.push(observation),
        }
    }
    deduped
}

/// The newest observation, if any.
pub fn latest(observations: &[Observation]) -> Option<&Observation> {
    observations.iter().max_by_key(|o| o.time)
}

fn object_rows(rows: &[Value]) -> Vec<Map<String, Value>> {
    rows.iter().filter_map(|row| row.as_object().cloned()).collect()
}
