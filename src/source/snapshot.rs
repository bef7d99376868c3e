//! The unit of data handed from a source to the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::normalize::{latest, normalize_payload};
use crate::data::Observation;

/// One fetch cycle's worth of ice data.
///
/// `latest` is always present; a snapshot is only produced once a latest
/// reading has been obtained. History is optional and may be empty, in which
/// case `history_error` explains why when the fetch failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceSnapshot {
    pub latest: Observation,
    #[serde(default)]
    pub history: Vec<Observation>,
    /// Where the latest reading came from.
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_error: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl IceSnapshot {
    /// Build a snapshot from any payload the normalizer understands.
    ///
    /// The newest row becomes `latest` and every row is kept as history.
    /// Returns `None` when the payload has no usable rows.
    pub fn from_payload(payload: &serde_json::Value, endpoint: &str) -> Option<Self> {
        let history = normalize_payload(payload);
        let newest = latest(&history)?.clone();
        Some(Self {
            latest: newest,
            history,
            endpoint: endpoint.to_string(),
            history_error: None,
            fetched_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Lake;
    use serde_json::json;

    #[test]
    fn test_from_payload_uses_newest_row() {
        let payload = json!({
            "rows": [
                {"time": "2024-02-14T12:00:00Z", "Erie": 60.0},
                {"time": "2024-02-15T12:00:00Z", "Erie": 65.0}
            ]
        });

        let snapshot = IceSnapshot::from_payload(&payload, "file: ice.json").unwrap();
        assert_eq!(snapshot.latest.get(Lake::Erie), Some(65.0));
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.endpoint, "file: ice.json");
        assert!(snapshot.history_error.is_none());
    }

    #[test]
    fn test_from_payload_without_rows() {
        assert!(IceSnapshot::from_payload(&json!({"rows": []}), "x").is_none());
    }
}
