//! Layered configuration.
//!
//! Settings are resolved from built-in defaults, then an optional TOML file,
//! then `ICEWATCH_*` environment variables (`__` separates sections, e.g.
//! `ICEWATCH_SERVER__PORT=9090`). Command-line flags override all of these
//! in `main.rs`.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! site_dir = "site"
//!
//! [upstream]
//! erddap_url = "https://apps.glerl.noaa.gov/erddap/tabledap/glerlIce.json?time,Superior,Michigan,Huron,Erie,Ontario,GL_Total"
//! timeout_secs = 14
//! insecure_fallback = true
//!
//! [watch]
//! proxy_url = "http://localhost:8080"
//! history_days = 90
//! refresh = "30m"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::noaa::fetch::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::noaa::upstream::{DEFAULT_ERDDAP_ENDPOINT, DEFAULT_HISTORY_DAYS};
use crate::noaa::{FetchError, Fetcher, Upstream};

/// Top-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub watch: WatchSettings,
}

/// Proxy server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory served for non-API paths.
    pub site_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            site_dir: PathBuf::from("site"),
        }
    }
}

/// NOAA upstream settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    pub erddap_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub insecure_fallback: bool,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            erddap_url: DEFAULT_ERDDAP_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            insecure_fallback: true,
        }
    }
}

impl UpstreamSettings {
    /// Endpoint builder for the configured table.
    pub fn upstream(&self) -> Upstream {
        Upstream::new(self.erddap_url.clone())
    }

    /// HTTP fetcher with the configured agent, timeout and fallback.
    pub fn fetcher(&self) -> Result<Fetcher, FetchError> {
        Fetcher::builder()
            .user_agent(self.user_agent.clone())
            .timeout(Duration::from_secs(self.timeout_secs))
            .insecure_fallback(self.insecure_fallback)
            .build()
    }
}

/// Dashboard settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    /// Local proxy to try before upstream.
    pub proxy_url: Option<String>,
    pub history_days: u32,
    /// Refresh interval, e.g. "30m" or "3600".
    pub refresh: String,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            proxy_url: None,
            history_days: DEFAULT_HISTORY_DAYS,
            refresh: "30m".to_string(),
        }
    }
}

impl Settings {
    /// Load settings, layering an optional file and the environment over
    /// the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("ICEWATCH")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Invalid configuration")
    }
}
