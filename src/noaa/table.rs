//! ERDDAP table decoding and history reshaping.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data::normalize::{parse_time, to_number};

/// Zip `table.columnNames` with each entry of `table.rows`.
///
/// Non-array rows are skipped. Short rows yield maps holding only the
/// columns they cover. Anything else malformed yields an empty list.
pub fn extract_rows(payload: &Value) -> Vec<Map<String, Value>> {
    let Some(table) = payload.get("table").and_then(Value::as_object) else {
        return Vec::new();
    };
    let (Some(Value::Array(columns)), Some(Value::Array(rows))) =
        (table.get("columnNames"), table.get("rows"))
    else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(Value::as_array)
        .map(|row| {
            columns
                .iter()
                .zip(row.iter())
                .filter_map(|(name, value)| Some((name.as_str()?.to_string(), value.clone())))
                .collect()
        })
        .collect()
}

/// One row of the proxy's history payload.
///
/// Field names match the upstream columns so the payload reads like the
/// ERDDAP table it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub time: String,
    #[serde(rename = "Superior")]
    pub superior: Option<f64>,
    #[serde(rename = "Michigan")]
    pub michigan: Option<f64>,
    #[serde(rename = "Huron")]
    pub huron: Option<f64>,
    #[serde(rename = "Erie")]
    pub erie: Option<f64>,
    #[serde(rename = "Ontario")]
    pub ontario: Option<f64>,
    #[serde(rename = "GL_Total")]
    pub gl_total: Option<f64>,
}

impl HistoryRow {
    fn from_row(time: String, row: &Map<String, Value>) -> Self {
        let number = |column: &str| row.get(column).and_then(to_number);
        Self {
            time,
            superior: number("Superior"),
            michigan: number("Michigan"),
            huron: number("Huron"),
            erie: number("Erie"),
            ontario: number("Ontario"),
            gl_total: number("GL_Total"),
        }
    }
}

/// Document served by `/api/ice-history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPayload {
    pub generated_at: String,
    pub days: u32,
    pub rows: Vec<HistoryRow>,
}

impl HistoryPayload {
    pub fn new(days: u32, rows: Vec<HistoryRow>, now: DateTime<Utc>) -> Self {
        Self {
            generated_at: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            days,
            rows,
        }
    }
}

/// Keep rows from the last `days` days.
///
/// Rows whose time does not parse are dropped. Values are converted to
/// numbers but not clamped; the dashboard does that when it normalizes.
pub fn trim_history_rows(
    rows: &[Map<String, Value>],
    days: u32,
    now: DateTime<Utc>,
) -> Vec<HistoryRow> {
    let cutoff = now - Duration::days(i64::from(days));

    rows.iter()
        .filter_map(|row| {
            let time_text = match row.get("time") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            let stamp = parse_time(&time_text)?;
            (stamp >= cutoff).then(|| HistoryRow::from_row(time_text, row))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn table() -> Value {
        json!({
            "table": {
                "columnNames": ["time", "Superior", "Michigan", "Huron", "Erie", "Ontario", "GL_Total"],
                "columnTypes": ["String", "float", "float", "float", "float", "float", "float"],
                "rows": [
                    ["2024-01-01T12:00:00Z", 1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
                    "not a row",
                    ["2024-03-01T12:00:00Z", "10.5", null, 30.0],
                    ["garbage-time", 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]
                ]
            }
        })
    }

    #[test]
    fn extract_rows_zips_columns() {
        let rows = extract_rows(&table());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("Erie"), Some(&json!(4.0)));
        // Short row only carries the columns it has
        assert_eq!(rows[1].len(), 4);
        assert!(rows[1].get("Ontario").is_none());
    }

    #[test]
    fn extract_rows_handles_malformed_tables() {
        assert!(extract_rows(&json!({})).is_empty());
        assert!(extract_rows(&json!({"table": []})).is_empty());
        assert!(extract_rows(&json!({"table": {"columnNames": "x", "rows": []}})).is_empty());
        assert!(extract_rows(&json!({"table": {"columnNames": ["time"]}})).is_empty());
    }

    #[test]
    fn trim_keeps_recent_rows() {
        let rows = extract_rows(&table());
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let trimmed = trim_history_rows(&rows, 30, now);

        assert_eq!(trimmed.len(), 1);
        let row = &trimmed[0];
        assert_eq!(row.time, "2024-03-01T12:00:00Z");
        assert_eq!(row.superior, Some(10.5));
        assert_eq!(row.michigan, None);
        assert_eq!(row.huron, Some(30.0));
        assert_eq!(row.gl_total, None);
    }

    #[test]
    fn trim_with_wide_window_keeps_all_parseable() {
        let rows = extract_rows(&table());
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        assert_eq!(trim_history_rows(&rows, 365, now).len(), 2);
    }

    #[test]
    fn history_row_uses_upstream_names() {
        let row = HistoryRow {
            time: "2024-03-01T12:00:00Z".to_string(),
            superior: Some(1.0),
            michigan: None,
            huron: None,
            erie: Some(2.0),
            ontario: None,
            gl_total: Some(3.0),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["Superior"], json!(1.0));
        assert_eq!(value["GL_Total"], json!(3.0));
        assert_eq!(value["Michigan"], Value::Null);
    }

    #[test]
    fn payload_formats_generated_at() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 8, 5, 9).unwrap();
        let payload = HistoryPayload::new(30, Vec::new(), now);
        assert_eq!(payload.generated_at, "2024-03-10T08:05:09Z");
        assert_eq!(payload.days, 30);
    }
}
