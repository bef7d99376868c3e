//! Proxy route handlers.
//!
//! Both routes walk a fixed endpoint list and answer with the first success.
//! A fully failed list becomes a 502 carrying one detail line per endpoint.

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::state::SharedState;
use crate::noaa::upstream::days_from_query;
use crate::noaa::{
    clamp_history_days, extract_rows, trim_history_rows, FetchError, HistoryPayload,
};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Body of the 502 answer.
#[derive(Debug, Serialize)]
pub struct ProxyError {
    pub error: &'static str,
    pub details: Vec<String>,
}

/// `GET /api/ice-latest`: the newest upstream row, passed through verbatim.
pub async fn ice_latest(State(state): State<SharedState>) -> Response {
    let mut errors = Vec::new();

    for endpoint in state.upstream.latest_endpoints() {
        match state.fetcher.fetch_bytes(&endpoint).await {
            Ok(body) => {
                info!(%endpoint, bytes = body.len(), "served latest ice data");
                return json_response(StatusCode::OK, body);
            }
            Err(e) => {
                warn!(%endpoint, error = %e, "latest endpoint failed");
                errors.push(format!("{}: {}", endpoint, e));
            }
        }
    }

    error_response(errors)
}

/// `GET /api/ice-history?days=N`: upstream rows from the last `N` days,
/// reshaped into [`HistoryPayload`].
pub async fn ice_history(
    State(state): State<SharedState>,
    RawQuery(query): RawQuery,
) -> Response {
    let days = clamp_history_days(query.as_deref().and_then(days_from_query));
    let now = Utc::now();
    let mut errors = Vec::new();

    for endpoint in state.upstream.history_endpoints(days, now) {
        match history_payload(&state, &endpoint, days, now).await {
            Ok(payload) => {
                info!(%endpoint, days, rows = payload.rows.len(), "served ice history");
                return match serde_json::to_vec(&payload) {
                    Ok(body) => json_response(StatusCode::OK, body),
                    Err(e) => error_response(vec![format!("{}: {}", endpoint, e)]),
                };
            }
            Err(e) => {
                warn!(%endpoint, error = %e, "history endpoint failed");
                errors.push(format!("{}: {}", endpoint, e));
            }
        }
    }

    error_response(errors)
}

async fn history_payload(
    state: &SharedState,
    endpoint: &str,
    days: u32,
    now: DateTime<Utc>,
) -> Result<HistoryPayload, FetchError> {
    let payload = state.fetcher.fetch_json(endpoint).await?;

    let rows = extract_rows(&payload);
    if rows.is_empty() {
        return Err(FetchError::NoRows);
    }

    let trimmed = trim_history_rows(&rows, days, now);
    if trimmed.is_empty() {
        return Err(FetchError::NoRowsInRange);
    }

    Ok(HistoryPayload::new(days, trimmed, Utc::now()))
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, JSON_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
        .into_response()
}

fn error_response(details: Vec<String>) -> Response {
    let error = ProxyError {
        error: "Unable to fetch NOAA data.",
        details,
    };
    // Serializing a struct of strings cannot fail; fall back to an empty body
    // rather than panic.
    let body = serde_json::to_vec(&error).unwrap_or_default();
    json_response(StatusCode::BAD_GATEWAY, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_error_response_shape() {
        let response = error_response(vec!["http://a: HTTP 500".to_string()]);
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            JSON_CONTENT_TYPE
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Unable to fetch NOAA data.");
        assert_eq!(value["details"][0], "http://a: HTTP 500");
    }
}
