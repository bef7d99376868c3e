//! Local proxy in front of the NOAA ERDDAP service.
//!
//! Exposes `/api/ice-latest` and `/api/ice-history` and serves a static site
//! directory for every other path. The proxy holds no state between requests
//! and does no caching.

pub mod handlers;
pub mod router;
pub mod state;

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

pub use router::build_router;
pub use state::{AppState, SharedState};

/// Where and what to serve.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    pub site_dir: PathBuf,
}

/// Bind and serve until Ctrl-C.
pub async fn run(state: AppState, options: ServeOptions) -> Result<()> {
    let listener = bind(&options).await?;
    info!(site_dir = %options.site_dir.display(), "static files");

    serve(listener, state, &options.site_dir, shutdown_signal()).await?;

    info!("Shutting down server...");
    Ok(())
}

/// Bind the listen socket. `host` may be a name such as `localhost`.
pub async fn bind(options: &ServeOptions) -> Result<TcpListener> {
    let listener = TcpListener::bind((options.host.as_str(), options.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", options.host, options.port))?;
    let addr = listener.local_addr()?;
    info!("Serving Great Lakes Ice Watch at http://{}", addr);
    Ok(listener)
}

/// Serve the proxy on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    site_dir: &Path,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state, site_dir);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
