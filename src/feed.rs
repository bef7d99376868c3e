//! Dashboard-side fetching with endpoint fallback.
//!
//! The dashboard prefers the local proxy when one is configured and falls
//! back to querying ERDDAP directly. Each request walks a fixed candidate
//! list and stops at the first endpoint that yields usable rows. There is no
//! retry scheduling: a fully failed list is reported and the next refresh
//! starts over.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::data::normalize::normalize_payload;
use crate::data::Observation;
use crate::noaa::{FetchError, Fetcher, Upstream};
use crate::source::IceSnapshot;

/// Fetches latest and historical ice data from the proxy or upstream.
#[derive(Debug, Clone)]
pub struct IceFeed {
    fetcher: Fetcher,
    upstream: Upstream,
    proxy: Option<String>,
}

impl IceFeed {
    pub fn new(fetcher: Fetcher, upstream: Upstream) -> Self {
        Self {
            fetcher,
            upstream,
            proxy: None,
        }
    }

    /// Try a local proxy (e.g. `http://localhost:8080`) before upstream.
    pub fn with_proxy(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.proxy = Some(base.trim_end_matches('/').to_string());
        self
    }

    /// Short description of where data is fetched from.
    pub fn description(&self) -> String {
        match &self.proxy {
            Some(proxy) => format!("proxy: {}", proxy),
            None => "noaa: erddap".to_string(),
        }
    }

    /// Endpoints tried, in order, for the latest reading.
    pub fn latest_candidates(&self) -> Vec<String> {
        let mut candidates = Vec::new();
        if let Some(proxy) = &self.proxy {
            candidates.push(format!("{}/api/ice-latest", proxy));
        }
        candidates.extend(self.upstream.latest_endpoints());
        candidates
    }

    /// Endpoints tried, in order, for history.
    pub fn history_candidates(&self, days: u32, now: DateTime<Utc>) -> Vec<String> {
        let mut candidates = Vec::new();
        if let Some(proxy) = &self.proxy {
            candidates.push(format!("{}/api/ice-history?days={}", proxy, days));
        }
        candidates.extend(self.upstream.history_endpoints(days, now));
        candidates
    }

    /// Fetch the newest observation and the endpoint that supplied it.
    pub async fn fetch_latest(&self) -> Result<(Observation, String), FetchError> {
        let (mut observations, endpoint) = self.first_with_rows(&self.latest_candidates()).await?;
        // Observations are sorted ascending and the list is non-empty.
        let latest = observations.pop().ok_or(FetchError::NoRows)?;
        Ok((latest, endpoint))
    }

    /// Fetch the last `days` days of observations.
    pub async fn fetch_history(
        &self,
        days: u32,
    ) -> Result<(Vec<Observation>, String), FetchError> {
        let now = Utc::now();
        let cutoff = now - Duration::days(i64::from(days));
        let candidates = self.history_candidates(days, now);

        let mut errors = Vec::new();
        for endpoint in candidates {
            match self.rows_from(&endpoint).await {
                Ok(observations) => {
                    let trimmed: Vec<Observation> =
                        observations.into_iter().filter(|o| o.time >= cutoff).collect();
                    if trimmed.is_empty() {
                        warn!(%endpoint, "history endpoint returned nothing in range");
                        errors.push(format!("{}: {}", endpoint, FetchError::NoRowsInRange));
                        continue;
                    }
                    return Ok((trimmed, endpoint));
                }
                Err(e) => {
                    warn!(%endpoint, error = %e, "history endpoint failed");
                    errors.push(format!("{}: {}", endpoint, e));
                }
            }
        }
        Err(FetchError::AllEndpointsFailed(errors))
    }

    /// Fetch latest (required) then history (optional).
    pub async fn fetch_snapshot(&self, days: u32) -> Result<IceSnapshot, FetchError> {
        let (latest, endpoint) = self.fetch_latest().await?;
        info!(%endpoint, time = %latest.time, "latest ice data fetched");

        let (history, history_error) = match self.fetch_history(days).await {
            Ok((history, history_endpoint)) => {
                debug!(endpoint = %history_endpoint, rows = history.len(), "history fetched");
                (history, None)
            }
            Err(e) => (Vec::new(), Some(e.to_string())),
        };

        Ok(IceSnapshot {
            latest,
            history,
            endpoint,
            history_error,
            fetched_at: Utc::now(),
        })
    }

    async fn first_with_rows(
        &self,
        candidates: &[String],
    ) -> Result<(Vec<Observation>, String), FetchError> {
        let mut errors = Vec::new();
        for endpoint in candidates {
            match self.rows_from(endpoint).await {
                Ok(observations) => return Ok((observations, endpoint.clone())),
                Err(e) => {
                    warn!(%endpoint, error = %e, "endpoint failed, trying next");
                    errors.push(format!("{}: {}", endpoint, e));
                }
            }
        }
        Err(FetchError::AllEndpointsFailed(errors))
    }

    async fn rows_from(&self, endpoint: &str) -> Result<Vec<Observation>, FetchError> {
        let payload = self.fetcher.fetch_json(endpoint).await?;
        let observations = normalize_payload(&payload);
        if observations.is_empty() {
            return Err(FetchError::NoRows);
        }
        Ok(observations)
    }
}
