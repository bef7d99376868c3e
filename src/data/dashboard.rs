//! Dashboard model.
//!
//! Transforms a raw [`IceSnapshot`] into per-lake summaries with level,
//! rank and change figures ready for display and export.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use super::history::{Trend, TrendSet};
use super::observation::{IceLevel, Lake, Observation};
use super::ranking::{rank, RankedLake};
use crate::source::IceSnapshot;

/// Geometry of the SVG sparkline written to exports.
const EXPORT_SPARKLINE_WIDTH: f64 = 120.0;
const EXPORT_SPARKLINE_HEIGHT: f64 = 32.0;
const EXPORT_SPARKLINE_PADDING: f64 = 2.0;

/// Everything the dashboard shows about one lake.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LakeSummary {
    pub lake: Lake,
    pub coverage: Option<f64>,
    pub level: IceLevel,
    /// Rank among the five lakes; `None` for the basin total.
    pub rank: Option<usize>,
    pub change_7d: Option<f64>,
    pub change_30d: Option<f64>,
}

impl LakeSummary {
    /// Trend over the last week, when it can be computed.
    pub fn trend(&self) -> Option<Trend> {
        self.change_7d.map(Trend::from_change)
    }

    /// Gauge fill, `0.0..=1.0`.
    pub fn fill(&self) -> f64 {
        self.coverage.map_or(0.0, |v| (v / 100.0).clamp(0.0, 1.0))
    }
}

/// Complete processed ice data ready for display.
#[derive(Debug, Clone)]
pub struct IceData {
    pub latest: Observation,
    /// One entry per [`Lake::ALL`], in that order.
    pub lakes: Vec<LakeSummary>,
    pub ranking: Vec<RankedLake>,
    pub trends: TrendSet,
    pub endpoint: String,
    pub history_error: Option<String>,
    pub fetched_at: DateTime<Utc>,
    pub last_updated: Instant,
}

impl IceData {
    /// Load and process ice data from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content, &format!("file: {}", path.display()))
    }

    /// Parse ice data from a JSON string in any supported payload shape.
    pub fn parse(content: &str, endpoint: &str) -> Result<Self> {
        let payload: Value = serde_json::from_str(content)?;
        let snapshot = IceSnapshot::from_payload(&payload, endpoint)
            .context("Payload contains no ice observations")?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Convert an IceSnapshot into processed IceData.
    ///
    /// This is the primary conversion method used by all data sources.
    pub fn from_snapshot(snapshot: IceSnapshot) -> Self {
        let trends = TrendSet::from_history(&snapshot.history);
        let ranking = rank(&snapshot.latest);

        let lakes = Lake::ALL
            .iter()
            .map(|&lake| {
                let coverage = snapshot.latest.get(lake);
                LakeSummary {
                    lake,
                    coverage,
                    level: IceLevel::classify(coverage),
                    rank: ranking.iter().find(|r| r.lake == lake).map(|r| r.position),
                    change_7d: trends.change_over(lake, 7, &snapshot.latest),
                    change_30d: trends.change_over(lake, 30, &snapshot.latest),
                }
            })
            .collect();

        Self {
            latest: snapshot.latest,
            lakes,
            ranking,
            trends,
            endpoint: snapshot.endpoint,
            history_error: snapshot.history_error,
            fetched_at: snapshot.fetched_at,
            last_updated: Instant::now(),
        }
    }

    /// Summary for one lake.
    pub fn lake(&self, lake: Lake) -> &LakeSummary {
        &self.lakes[lake.index()]
    }

    /// The basin-wide summary.
    pub fn total(&self) -> &LakeSummary {
        self.lake(Lake::Total)
    }

    /// The five individual lakes, west to east.
    pub fn individual_lakes(&self) -> &[LakeSummary] {
        &self.lakes[..Lake::INDIVIDUAL.len()]
    }

    /// Export document: latest values, levels, ranking, changes and an SVG
    /// sparkline path per lake.
    pub fn summary_json(&self) -> Value {
        let lakes: Vec<Value> = self
            .lakes
            .iter()
            .map(|summary| {
                let sparkline = self.trends.sparkline(summary.lake);
                json!({
                    "lake": summary.lake.column(),
                    "name": summary.lake.label(),
                    "coverage": summary.coverage,
                    "level": summary.level.symbol(),
                    "rank": summary.rank,
                    "change_7d": summary.change_7d,
                    "change_30d": summary.change_30d,
                    "history_points": sparkline.values().len(),
                    "sparkline_path": sparkline.svg_path(
                        EXPORT_SPARKLINE_WIDTH,
                        EXPORT_SPARKLINE_HEIGHT,
                        EXPORT_SPARKLINE_PADDING,
                    ),
                })
            })
            .collect();

        let ranking: Vec<Value> = self
            .ranking
            .iter()
            .map(|r| {
                json!({
                    "position": r.position,
                    "lake": r.lake.column(),
                    "coverage": r.coverage,
                })
            })
            .collect();

        json!({
            "observed_at": self.latest.time.to_rfc3339(),
            "fetched_at": self.fetched_at.to_rfc3339(),
            "endpoint": self.endpoint,
            "history_error": self.history_error,
            "lakes": lakes,
            "ranking": ranking,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn snapshot() -> IceSnapshot {
        let latest_time = Utc.with_ymd_and_hms(2024, 2, 20, 12, 0, 0).unwrap();
        let history: Vec<Observation> = (0..20)
            .map(|i| {
                let v = 40.0 + i as f64;
                Observation::new(latest_time - Duration::days(19 - i))
                    .with(Lake::Erie, v)
                    .with(Lake::Superior, 5.0)
                    .with(Lake::Total, v / 2.0)
            })
            .collect();
        let latest = history.last().unwrap().clone();
        IceSnapshot {
            latest,
            history,
            endpoint: "test".to_string(),
            history_error: None,
            fetched_at: latest_time,
        }
    }

    #[test]
    fn test_from_snapshot_builds_summaries() {
        let data = IceData::from_snapshot(snapshot());
        assert_eq!(data.lakes.len(), 6);

        let erie = data.lake(Lake::Erie);
        assert_eq!(erie.coverage, Some(59.0));
        assert_eq!(erie.level, IceLevel::Heavy);
        assert_eq!(erie.rank, Some(1));
        assert_eq!(erie.change_7d, Some(7.0));
        // History only spans 19 days, so the 30-day change uses the oldest point
        assert_eq!(erie.change_30d, Some(19.0));
        assert_eq!(erie.trend(), Some(Trend::Rising));
        assert!((erie.fill() - 0.59).abs() < 1e-9);

        let superior = data.lake(Lake::Superior);
        assert_eq!(superior.level, IceLevel::Open);
        assert_eq!(superior.trend(), Some(Trend::Steady));

        assert_eq!(data.total().rank, None);
        assert_eq!(data.individual_lakes().len(), 5);
    }

    #[test]
    fn test_missing_lake_has_unknown_level() {
        let data = IceData::from_snapshot(snapshot());
        let huron = data.lake(Lake::Huron);
        assert_eq!(huron.coverage, None);
        assert_eq!(huron.level, IceLevel::Unknown);
        assert_eq!(huron.fill(), 0.0);
        assert_eq!(huron.change_7d, None);
    }

    #[test]
    fn test_summary_json_shape() {
        let data = IceData::from_snapshot(snapshot());
        let summary = data.summary_json();

        assert_eq!(summary["lakes"].as_array().unwrap().len(), 6);
        assert_eq!(summary["ranking"].as_array().unwrap().len(), 5);
        assert_eq!(summary["ranking"][0]["lake"], "Erie");
        assert_eq!(summary["lakes"][5]["lake"], "GL_Total");
        assert_eq!(summary["lakes"][3]["history_points"], 20);
        assert!(summary["lakes"][3]["sparkline_path"]
            .as_str()
            .unwrap()
            .starts_with("M "));
        assert_eq!(summary["endpoint"], "test");
    }

    #[test]
    fn test_lake_summary_serializes() {
        let data = IceData::from_snapshot(snapshot());
        let value = serde_json::to_value(data.lake(Lake::Erie)).unwrap();
        assert_eq!(value["lake"], "Erie");
        assert_eq!(value["level"], "Heavy");
        assert_eq!(value["rank"], 1);
        assert_eq!(value["change_7d"], 7.0);
    }

    #[test]
    fn test_parse_payload() {
        let content = r#"{"rows": [{"time": "2024-02-20T12:00:00Z", "Ontario": 12.0}]}"#;
        let data = IceData::parse(content, "inline").unwrap();
        assert_eq!(data.lake(Lake::Ontario).coverage, Some(12.0));
        assert!(data.trends.len(Lake::Ontario) == 1);

        assert!(IceData::parse(r#"{"rows": []}"#, "inline").is_err());
        assert!(IceData::parse("not json", "inline").is_err());
    }
}
