//! HTTP fetching with the certificate fallback.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::FetchError;

/// User agent sent upstream.
pub const DEFAULT_USER_AGENT: &str = "GreatLakesIceWatch/1.0";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(14);

/// Fetches raw bodies from upstream endpoints.
///
/// When `insecure_fallback` is enabled a second client with certificate
/// verification disabled is kept around and used only after the verified
/// request fails on its certificate. Hosts without a CA bundle can still
/// reach the public data service this way.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    insecure: Option<Client>,
}

impl Fetcher {
    /// Create a new builder for configuring the fetcher.
    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::default()
    }

    /// GET a URL and return its body.
    ///
    /// Non-2xx statuses and empty bodies are errors.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match Self::get(&self.client, url).await {
            Err(FetchError::Certificate(reason)) => match &self.insecure {
                Some(insecure) => {
                    warn!(url, %reason, "certificate verification failed, retrying without verification");
                    Self::get(insecure, url).await
                }
                None => Err(FetchError::Certificate(reason)),
            },
            other => other,
        }
    }

    /// GET a URL and decode its body as JSON.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let body = self.fetch_bytes(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!(url, "fetching");
        let response = client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(body.to_vec())
    }
}

/// Builder for [`Fetcher`].
#[derive(Debug)]
pub struct FetcherBuilder {
    user_agent: String,
    timeout: Duration,
    insecure_fallback: bool,
}

impl Default for FetcherBuilder {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            insecure_fallback: true,
        }
    }
}

impl FetcherBuilder {
    /// Set the User-Agent header (default: `GreatLakesIceWatch/1.0`).
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout (default: 14 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Allow a retry without certificate verification (default: on).
    pub fn insecure_fallback(mut self, enabled: bool) -> Self {
        self.insecure_fallback = enabled;
        self
    }

    /// Build the fetcher.
    pub fn build(self) -> Result<Fetcher, FetchError> {
        let client = self.client_builder().build()?;
        let insecure = if self.insecure_fallback {
            Some(self.client_builder().danger_accept_invalid_certs(true).build()?)
        } else {
            None
        };
        Ok(Fetcher { client, insecure })
    }

    fn client_builder(&self) -> reqwest::ClientBuilder {
        Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout)
    }
}
