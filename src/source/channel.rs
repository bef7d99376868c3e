//! Channel-based data source.
//!
//! Receives ice snapshots via a tokio watch channel. Useful when another
//! part of a program already fetches the data and only wants to hand it to
//! the dashboard.

use tokio::sync::watch;

use super::{DataSource, IceSnapshot};

/// A data source that receives snapshots via a channel.
///
/// The producer sends `Some(snapshot)` through the channel, and this source
/// provides it to the TUI. The channel starts out empty (`None`).
///
/// # Example
///
/// ```
/// use icewatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("embedded");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Option<IceSnapshot>>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - A description of where snapshots come from
    pub fn new(receiver: watch::Receiver<Option<IceSnapshot>>, source_description: &str) -> Self {
        let mut receiver = receiver;
        // A value already present before the first poll should be delivered
        receiver.mark_changed();
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair for sending snapshots to a ChannelSource.
    pub fn create(source_description: &str) -> (watch::Sender<Option<IceSnapshot>>, Self) {
        let (tx, rx) = watch::channel(None);
        (tx, Self::new(rx, source_description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<IceSnapshot> {
        // Check if there's a new value without blocking
        if self.receiver.has_changed().unwrap_or(false) {
            self.receiver.borrow_and_update().clone()
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        if self.receiver.has_changed().is_err() {
            Some("Channel closed".to_string())
        } else {
            None
        }
    }
}
