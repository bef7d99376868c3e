//! HTTP data source.
//!
//! Periodically fetches snapshots through an [`IceFeed`] on a background
//! task, so the TUI never blocks on the network.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tracing::{error, warn};

use super::{DataSource, IceSnapshot};
use crate::feed::IceFeed;

/// Shortest wait between fetches; shorter intervals are raised to this.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// A data source that polls the proxy or NOAA service over HTTP.
///
/// A background task fetches a snapshot immediately, then again every
/// `interval` (at least [`MIN_REFRESH_INTERVAL`]) or whenever
/// [`HttpSource::request_refresh`] is called.
/// Snapshots are delivered through a channel and picked up by `poll()`.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use icewatch::noaa::{Fetcher, Upstream};
/// use icewatch::noaa::upstream::DEFAULT_ERDDAP_ENDPOINT;
/// use icewatch::{HttpSource, IceFeed};
///
/// # tokio_test::block_on(async {
/// let fetcher = Fetcher::builder().build().unwrap();
/// let feed = IceFeed::new(fetcher, Upstream::new(DEFAULT_ERDDAP_ENDPOINT))
///     .with_proxy("http://localhost:8080");
/// let source = HttpSource::spawn(feed, 90, Duration::from_secs(1800));
/// # });
/// ```
#[derive(Debug)]
pub struct HttpSource {
    receiver: mpsc::Receiver<IceSnapshot>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
    wake: Arc<Notify>,
    task: JoinHandle<()>,
}

impl HttpSource {
    /// Spawn the fetch loop. Must be called within a tokio runtime.
    pub fn spawn(feed: IceFeed, history_days: u32, interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel(4);
        let last_error = Arc::new(Mutex::new(None));
        let wake = Arc::new(Notify::new());
        let description = feed.description();
        if interval < MIN_REFRESH_INTERVAL {
            warn!(?interval, "refresh interval too short, using {:?}", MIN_REFRESH_INTERVAL);
        }
        let interval = interval.max(MIN_REFRESH_INTERVAL);

        let error_handle = last_error.clone();
        let wake_handle = wake.clone();
        let task = tokio::spawn(async move {
            loop {
                match feed.fetch_snapshot(history_days).await {
                    Ok(snapshot) => {
                        set_error(&error_handle, None);
                        if tx.send(snapshot).await.is_err() {
                            // Receiver dropped
                            break;
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "failed to fetch ice data");
                        set_error(&error_handle, Some(e.to_string()));
                    }
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = wake_handle.notified() => {}
                }
            }
        });

        Self {
            receiver: rx,
            description,
            last_error,
            wake,
            task,
        }
    }

    /// Wake the fetch loop now instead of waiting for the interval.
    pub fn request_refresh(&self) {
        self.wake.notify_one();
    }
}

fn set_error(slot: &Mutex<Option<String>>, value: Option<String>) {
    if let Ok(mut guard) = slot.lock() {
        *guard = value;
    }
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<IceSnapshot> {
        // Drain to the newest snapshot if several queued up
        let mut newest = None;
        while let Ok(snapshot) = self.receiver.try_recv() {
            newest = Some(snapshot);
        }
        newest
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|guard| guard.clone())
    }

    fn refresh(&mut self) {
        self.request_refresh();
    }
}

impl Drop for HttpSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}
