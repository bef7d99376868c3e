//! # icewatch
//!
//! A terminal dashboard and local proxy for Great Lakes ice cover, backed by
//! the NOAA GLERL ERDDAP service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Dashboard                            │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌──────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal │  │
//! │  │ (state) │    │(processing)   │(rendering)   │          │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └──────────┘  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐    ┌──────────┐                                 │
//! │  │ source  │◀───│   feed   │◀── proxy ◀── server ◀── noaa    │
//! │  │ (input) │    │(fallback)│◀───────────────────────── noaa  │
//! │  └─────────┘    └──────────┘                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`noaa`]**: ERDDAP endpoint construction, the HTTP fetcher and table
//!   extraction shared by the proxy and the dashboard
//! - **[`server`]**: the axum proxy exposing `/api/ice-latest` and
//!   `/api/ice-history` and serving the static site
//! - **[`feed`]**: dashboard-side fetching that tries the proxy first and
//!   falls back to ERDDAP
//! - **[`source`]**: the [`DataSource`] trait with HTTP, file and channel
//!   implementations
//! - **[`data`]**: normalisation, ranking, trends and sparkline geometry
//! - **[`app`]**, **[`events`]**, **[`ui`]**: the ratatui dashboard
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Run the proxy and static site
//! icewatch serve --port 8080 --site-dir site
//!
//! # Watch through the proxy, falling back to NOAA directly
//! icewatch watch --proxy http://localhost:8080
//!
//! # Fetch once and print the summary
//! icewatch export --days 30
//! ```
//!
//! ### As a library with a file source
//!
//! ```
//! use icewatch::{App, FileSource};
//!
//! let source = Box::new(FileSource::new("ice.json"));
//! let app = App::new(source);
//! ```
//!
//! ### Feeding snapshots from your own code
//!
//! ```
//! use icewatch::{App, ChannelSource};
//!
//! let (tx, source) = ChannelSource::create("embedded");
//! let app = App::new(Box::new(source));
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod feed;
pub mod noaa;
pub mod server;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{IceData, IceLevel, Lake, Observation};
pub use feed::IceFeed;
pub use source::{ChannelSource, DataSource, FileSource, HttpSource, IceSnapshot};
