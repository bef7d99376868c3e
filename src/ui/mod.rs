//! Terminal rendering with ratatui.

pub mod common;
pub mod detail;
pub mod lakes;
pub mod ranking;
pub mod theme;
pub mod trends;

pub use theme::Theme;
