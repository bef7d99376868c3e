//! Error types for upstream access.

use thiserror::Error;

/// Errors that can occur when fetching ice data.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// TLS certificate could not be verified.
    #[error("Certificate verification failed: {0}")]
    Certificate(String),

    /// Upstream answered with a non-2xx status.
    #[error("HTTP {0}")]
    Status(u16),

    /// Upstream answered 2xx with nothing in the body.
    #[error("Empty response body")]
    EmptyBody,

    /// Body was not valid JSON.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Payload contained no usable rows.
    #[error("No rows returned")]
    NoRows,

    /// Payload rows all fell outside the requested window.
    #[error("No rows in requested date range")]
    NoRowsInRange,

    /// Every endpoint in the fallback list failed.
    #[error("All endpoints failed: {}", .0.join("; "))]
    AllEndpointsFailed(Vec<String>),
}

impl FetchError {
    /// Per-endpoint failure details, for error payloads.
    pub fn details(&self) -> Vec<String> {
        match self {
            FetchError::AllEndpointsFailed(details) => details.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if is_certificate_error(&err) {
            FetchError::Certificate(err.to_string())
        } else if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Walk the error source chain looking for a certificate failure.
///
/// reqwest does not expose TLS errors as a kind, so this matches on the
/// messages rustls and native-tls produce.
fn is_certificate_error(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if e.to_string().to_ascii_lowercase().contains("certificate") {
            return true;
        }
        current = e.source();
    }
    false
}
