//! Data models and processing for ice-cover snapshots.
//!
//! This module handles the transformation of raw payloads into clamped,
//! ranked, trend-annotated data suitable for display.
//!
//! ## Submodules
//!
//! - [`observation`]: Core records ([`Lake`], [`Observation`], [`IceLevel`])
//! - [`normalize`]: Payload normalization and percentage clamping
//! - [`ranking`]: Coverage ranking across the five lakes
//! - [`sparkline`]: Sparkline geometry (points, SVG paths, block levels)
//! - [`history`]: Per-lake series and windowed change
//! - [`dashboard`]: The processed model ([`IceData`], [`LakeSummary`])
//! - [`duration`]: Parsing refresh intervals and formatting ages
//!
//! ## Data Flow
//!
//! ```text
//! JSON payload (ERDDAP table / proxy history / file)
//!        │
//!        ▼
//! normalize_payload()  ──▶  IceSnapshot { latest, history }
//!                                 │
//!                                 ▼
//!                       IceData::from_snapshot()
//!                                 │
//!                                 ├──▶ rank()            (ranking)
//!                                 └──▶ TrendSet          (sparklines, change)
//! ```

pub mod dashboard;
pub mod duration;
pub mod history;
pub mod normalize;
pub mod observation;
pub mod ranking;
pub mod sparkline;

pub use dashboard::{IceData, LakeSummary};
pub use history::{Trend, TrendSet};
pub use observation::{IceLevel, Lake, Observation};
pub use ranking::{rank, RankedLake};
pub use sparkline::Sparkline;
