//! Shared state for the proxy handlers.

use std::sync::Arc;

use crate::noaa::{Fetcher, Upstream};

/// Shared state injected into every Axum handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub fetcher: Fetcher,
    pub upstream: Upstream,
}

impl AppState {
    pub fn new(fetcher: Fetcher, upstream: Upstream) -> Self {
        Self { fetcher, upstream }
    }
}

pub type SharedState = Arc<AppState>;
