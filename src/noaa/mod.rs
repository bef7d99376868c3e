//! Access to the NOAA GLERL ERDDAP ice-cover table.
//!
//! ## Submodules
//!
//! - [`upstream`]: Endpoint construction and history window parsing
//! - [`fetch`]: HTTP client with status/empty-body checks and the
//!   certificate fallback
//! - [`table`]: ERDDAP table decoding and the proxy's history payload
//! - [`error`]: [`FetchError`]

pub mod error;
pub mod fetch;
pub mod table;
pub mod upstream;

pub use error::FetchError;
pub use fetch::{Fetcher, FetcherBuilder};
pub use table::{extract_rows, trim_history_rows, HistoryPayload, HistoryRow};
pub use upstream::{clamp_history_days, Upstream};
