//! Per-lake trend tracking over the history window.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::observation::{Lake, Observation};
use super::sparkline::Sparkline;

/// Changes smaller than this (percentage points) count as steady.
const STEADY_BAND: f64 = 0.5;

/// Direction of change over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Rising,
    Falling,
    Steady,
}

impl Trend {
    /// Classify a change in percentage points.
    pub fn from_change(change: f64) -> Self {
        if change >= STEADY_BAND {
            Trend::Rising
        } else if change <= -STEADY_BAND {
            Trend::Falling
        } else {
            Trend::Steady
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Rising => "↑",
            Trend::Falling => "↓",
            Trend::Steady => "→",
        }
    }
}

/// Time series for every lake, built once per refresh.
#[derive(Debug, Clone, Default)]
pub struct TrendSet {
    series: HashMap<Lake, Vec<(DateTime<Utc>, f64)>>,
}

impl TrendSet {
    /// Split observations into per-lake series. Missing values are skipped,
    /// so each series only holds reported points.
    pub fn from_history(history: &[Observation]) -> Self {
        let mut series: HashMap<Lake, Vec<(DateTime<Utc>, f64)>> = HashMap::new();
        for observation in history {
            for lake in Lake::ALL {
                if let Some(value) = observation.get(lake) {
                    series.entry(lake).or_default().push((observation.time, value));
                }
            }
        }
        for points in series.values_mut() {
            points.sort_by_key(|(time, _)| *time);
        }
        Self { series }
    }

    /// True when no lake has any history.
    pub fn is_empty(&self) -> bool {
        self.series.values().all(Vec::is_empty)
    }

    /// Number of points recorded for a lake.
    pub fn len(&self, lake: Lake) -> usize {
        self.series.get(&lake).map_or(0, Vec::len)
    }

    /// Timestamped readings for a lake, oldest first.
    pub fn points(&self, lake: Lake) -> &[(DateTime<Utc>, f64)] {
        self.series.get(&lake).map(Vec::as_slice).unwrap_or_default()
    }

    /// Values for a lake, oldest first.
    pub fn series(&self, lake: Lake) -> Vec<f64> {
        self.series
            .get(&lake)
            .map(|points| points.iter().map(|(_, v)| *v).collect())
            .unwrap_or_default()
    }

    /// Sparkline for a lake against the 0..100 percent domain.
    pub fn sparkline(&self, lake: Lake) -> Sparkline {
        Sparkline::new(self.series(lake)).with_domain(0.0, 100.0)
    }

    /// Change in percentage points between the first reading at or after
    /// `latest.time - days` and the latest reading.
    ///
    /// Returns `None` when the latest value is missing or the window has no
    /// earlier point to compare against.
    pub fn change_over(&self, lake: Lake, days: i64, latest: &Observation) -> Option<f64> {
        let current = latest.get(lake)?;
        let cutoff = latest.time - Duration::days(days);
        let points = self.series.get(&lake)?;
        let (_, baseline) = points
            .iter()
            .find(|(time, _)| *time >= cutoff && *time < latest.time)?;
        Some(current - baseline)
    }

    /// Min and max over the whole window.
    pub fn extremes(&self, lake: Lake) -> Option<(f64, f64)> {
        let values = self.series(lake);
        let min = values.iter().copied().reduce(f64::min)?;
        let max = values.iter().copied().reduce(f64::max)?;
        Some((min, max))
    }

    /// Time span covered by the history, across all lakes.
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.series.values().filter_map(|p| p.first()).map(|(t, _)| *t).min()?;
        let last = self.series.values().filter_map(|p| p.last()).map(|(t, _)| *t).max()?;
        Some((first, last))
    }
}
