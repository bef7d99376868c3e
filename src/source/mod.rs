//! Data source abstraction for receiving ice snapshots.
//!
//! This module provides a trait-based abstraction for receiving ice data
//! from various sources (the NOAA service or local proxy, files, in-memory
//! channels).

mod channel;
mod file;
mod http;
mod snapshot;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use http::HttpSource;
pub use snapshot::IceSnapshot;

use std::fmt::Debug;

/// Trait for receiving ice data from various sources.
///
/// Implementations of this trait provide snapshots from different
/// backends - HTTP polling, file polling, or in-memory channels.
///
/// # Example
///
/// ```
/// use icewatch::{FileSource, DataSource};
///
/// let mut source = FileSource::new("ice.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Latest reading at {}", snapshot.latest.time);
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<IceSnapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Check if the source has encountered an error.
    ///
    /// Returns the error message if the last fetch failed.
    fn error(&self) -> Option<String>;

    /// Ask the source to fetch again as soon as possible.
    fn refresh(&mut self) {}
}
