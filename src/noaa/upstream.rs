//! ERDDAP endpoint construction.

use std::num::IntErrorKind;

use chrono::{DateTime, Duration, Utc};

/// GLERL ice-cover table with the six percentage columns.
pub const DEFAULT_ERDDAP_ENDPOINT: &str = "https://apps.glerl.noaa.gov/erddap/tabledap/glerlIce.json?time,Superior,Michigan,Huron,Erie,Ontario,GL_Total";

/// History window used when the request does not specify one.
pub const DEFAULT_HISTORY_DAYS: u32 = 90;
/// Smallest accepted history window.
pub const MIN_HISTORY_DAYS: u32 = 14;
/// Largest accepted history window.
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Extra days requested upstream beyond the window, trimmed afterwards.
const HISTORY_HEADROOM_DAYS: i64 = 7;

/// Builds the upstream URLs tried for each kind of request.
#[derive(Debug, Clone)]
pub struct Upstream {
    base: String,
}

impl Default for Upstream {
    fn default() -> Self {
        Self::new(DEFAULT_ERDDAP_ENDPOINT)
    }
}

impl Upstream {
    /// Create from a base tabledap query (must already carry the column list).
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// The unfiltered table query.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Endpoints tried in order for the latest reading.
    ///
    /// The first asks ERDDAP for only the newest row; the full table is the
    /// fallback for servers that reject `orderByMax`.
    pub fn latest_endpoints(&self) -> Vec<String> {
        vec![
            format!("{}&orderByMax(%22time%22)", self.base),
            self.base.clone(),
        ]
    }

    /// Table query restricted to rows newer than `days` (plus headroom) ago.
    pub fn history_endpoint(&self, days: u32, now: DateTime<Utc>) -> String {
        let cutoff = now - Duration::days(i64::from(days) + HISTORY_HEADROOM_DAYS);
        format!(
            "{}&time%3E={}",
            self.base,
            cutoff.format("%Y-%m-%dT00:00:00Z")
        )
    }

    /// Endpoints tried in order for history.
    pub fn history_endpoints(&self, days: u32, now: DateTime<Utc>) -> Vec<String> {
        vec![self.history_endpoint(days, now), self.base.clone()]
    }
}

/// Resolve the `days` query parameter.
///
/// Missing or unparseable values fall back to the default; the result is
/// clamped to the accepted window.
pub fn clamp_history_days(raw: Option<&str>) -> u32 {
    let days = raw
        .and_then(parse_days)
        .unwrap_or(i64::from(DEFAULT_HISTORY_DAYS));
    days.clamp(i64::from(MIN_HISTORY_DAYS), i64::from(MAX_HISTORY_DAYS)) as u32
}

/// Integers too large for `i64` saturate so they still clamp to the window
/// edge instead of falling back to the default.
fn parse_days(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(days) => Some(days),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Pull the first `days=` value out of a raw query string.
pub fn days_from_query(query: &str) -> Option<&str> {
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("days="))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn latest_endpoints_try_order_by_max_first() {
        let upstream = Upstream::new("https://example.test/ice.json?time,Erie");
        assert_eq!(
            upstream.latest_endpoints(),
            vec![
                "https://example.test/ice.json?time,Erie&orderByMax(%22time%22)".to_string(),
                "https://example.test/ice.json?time,Erie".to_string(),
            ]
        );
    }

    #[test]
    fn history_endpoint_adds_headroom() {
        let upstream = Upstream::new("https://example.test/ice.json?time");
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 15, 30, 0).unwrap();
        // 14 + 7 days before Mar 31 is Mar 10
        assert_eq!(
            upstream.history_endpoint(14, now),
            "https://example.test/ice.json?time&time%3E=2024-03-10T00:00:00Z"
        );
        let endpoints = upstream.history_endpoints(14, now);
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[1], upstream.base());
    }

    #[test]
    fn default_points_at_glerl() {
        assert!(Upstream::default().base().contains("glerlIce.json"));
        assert!(Upstream::default().base().ends_with("GL_Total"));
    }

    #[test]
    fn clamp_days() {
        assert_eq!(clamp_history_days(None), 90);
        assert_eq!(clamp_history_days(Some("abc")), 90);
        assert_eq!(clamp_history_days(Some("30")), 30);
        assert_eq!(clamp_history_days(Some("3")), 14);
        assert_eq!(clamp_history_days(Some("-5")), 14);
        assert_eq!(clamp_history_days(Some("9999")), 365);
    }

    #[test]
    fn clamp_days_saturates_huge_values() {
        assert_eq!(clamp_history_days(Some("99999999999999999999")), 365);
        assert_eq!(clamp_history_days(Some("-99999999999999999999")), 14);
        assert_eq!(clamp_history_days(Some(" 400 ")), 365);
        assert_eq!(clamp_history_days(Some("12.5")), 90);
    }

    #[test]
    fn days_query_parsing() {
        assert_eq!(days_from_query("days=30"), Some("30"));
        assert_eq!(days_from_query("x=1&days=45&days=60"), Some("45"));
        assert_eq!(days_from_query("x=1"), None);
        assert_eq!(days_from_query(""), None);
    }
}
