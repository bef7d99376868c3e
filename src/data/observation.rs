//! Core ice-cover records.
//!
//! An [`Observation`] is one row of the GLERL ice table: a timestamp plus a
//! percentage for each lake and for the basin as a whole.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the Great Lakes, or the basin-wide total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Lake {
    Superior,
    Michigan,
    Huron,
    Erie,
    Ontario,
    /// Basin-wide figure (`GL_Total` upstream).
    Total,
}

impl Lake {
    /// The five individual lakes, west to east.
    pub const INDIVIDUAL: [Lake; 5] = [
        Lake::Superior,
        Lake::Michigan,
        Lake::Huron,
        Lake::Erie,
        Lake::Ontario,
    ];

    /// Every column carried by an observation.
    pub const ALL: [Lake; 6] = [
        Lake::Superior,
        Lake::Michigan,
        Lake::Huron,
        Lake::Erie,
        Lake::Ontario,
        Lake::Total,
    ];

    /// Column name used by the ERDDAP table and the proxy payloads.
    pub fn column(&self) -> &'static str {
        match self {
            Lake::Superior => "Superior",
            Lake::Michigan => "Michigan",
            Lake::Huron => "Huron",
            Lake::Erie => "Erie",
            Lake::Ontario => "Ontario",
            Lake::Total => "GL_Total",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Lake::Total => "Great Lakes Total",
            other => other.column(),
        }
    }

    /// Position in [`Lake::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Lake::Superior => 0,
            Lake::Michigan => 1,
            Lake::Huron => 2,
            Lake::Erie => 3,
            Lake::Ontario => 4,
            Lake::Total => 5,
        }
    }

    /// Look a lake up by its upstream column name.
    pub fn from_column(name: &str) -> Option<Lake> {
        Lake::ALL.into_iter().find(|lake| lake.column() == name)
    }
}

impl fmt::Display for Lake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single timestamped ice-cover reading.
///
/// Percentages are always finite and within `0..=100`; the normalizer
/// enforces this before an observation is constructed from wire data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub time: DateTime<Utc>,
    coverage: [Option<f64>; 6],
}

impl Observation {
    /// Create an observation with no values.
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time,
            coverage: [None; 6],
        }
    }

    /// Builder-style setter, used mostly by tests and the normalizer.
    pub fn with(mut self, lake: Lake, value: f64) -> Self {
        self.set(lake, Some(value));
        self
    }

    /// Coverage percentage for a lake, if reported.
    pub fn get(&self, lake: Lake) -> Option<f64> {
        self.coverage[lake.index()]
    }

    /// Set a coverage percentage, clamping into `0..=100`.
    pub fn set(&mut self, lake: Lake, value: Option<f64>) {
        self.coverage[lake.index()] = value.and_then(super::normalize::clamp_percent);
    }

    /// True when no lake carries a value.
    pub fn is_empty(&self) -> bool {
        self.coverage.iter().all(Option::is_none)
    }
}

/// Coarse ice classification used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum IceLevel {
    Unknown,
    Open,
    Light,
    Heavy,
    Extensive,
}

impl IceLevel {
    /// Classify a coverage percentage.
    pub fn classify(coverage: Option<f64>) -> Self {
        match coverage {
            None => IceLevel::Unknown,
            Some(v) if v < 10.0 => IceLevel::Open,
            Some(v) if v < 40.0 => IceLevel::Light,
            Some(v) if v < 70.0 => IceLevel::Heavy,
            Some(_) => IceLevel::Extensive,
        }
    }

    /// Short label for tables.
    pub fn symbol(&self) -> &'static str {
        match self {
            IceLevel::Unknown => "--",
            IceLevel::Open => "OPEN",
            IceLevel::Light => "LIGHT",
            IceLevel::Heavy => "HEAVY",
            IceLevel::Extensive => "EXT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn column_names_round_trip() {
        for lake in Lake::ALL {
            assert_eq!(Lake::from_column(lake.column()), Some(lake));
        }
        assert_eq!(Lake::from_column("time"), None);
    }

    #[test]
    fn total_uses_upstream_column() {
        assert_eq!(Lake::Total.column(), "GL_Total");
        assert_eq!(Lake::Total.label(), "Great Lakes Total");
        assert_eq!(Lake::Erie.label(), "Erie");
    }

    #[test]
    fn set_clamps_values() {
        let time = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let obs = Observation::new(time)
            .with(Lake::Erie, 104.0)
            .with(Lake::Huron, -3.0);

        assert_eq!(obs.get(Lake::Erie), Some(100.0));
        assert_eq!(obs.get(Lake::Huron), Some(0.0));
        assert_eq!(obs.get(Lake::Ontario), None);
        assert!(!obs.is_empty());
    }

    #[test]
    fn set_rejects_non_finite() {
        let time = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let obs = Observation::new(time).with(Lake::Superior, f64::NAN);
        assert_eq!(obs.get(Lake::Superior), None);
        assert!(obs.is_empty());
    }

    #[test]
    fn ice_level_thresholds() {
        assert_eq!(IceLevel::classify(None), IceLevel::Unknown);
        assert_eq!(IceLevel::classify(Some(0.0)), IceLevel::Open);
        assert_eq!(IceLevel::classify(Some(9.99)), IceLevel::Open);
        assert_eq!(IceLevel::classify(Some(10.0)), IceLevel::Light);
        assert_eq!(IceLevel::classify(Some(40.0)), IceLevel::Heavy);
        assert_eq!(IceLevel::classify(Some(70.0)), IceLevel::Extensive);
    }
}
