//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{IceLevel, Trend};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Open water, under 10% cover.
    pub open: Color,
    /// Light cover.
    pub light_ice: Color,
    /// Heavy cover.
    pub heavy_ice: Color,
    /// Extensive cover, 70% and up.
    pub extensive_ice: Color,
    /// Errors and failed fetches.
    pub error: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            open: Color::Blue,
            light_ice: Color::LightCyan,
            heavy_ice: Color::LightBlue,
            extensive_ice: Color::White,
            error: Color::Red,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            open: Color::Blue,
            light_ice: Color::Cyan,
            heavy_ice: Color::LightBlue,
            extensive_ice: Color::DarkGray,
            error: Color::Red,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Foreground color for an ice level.
    pub fn level_color(&self, level: IceLevel) -> Color {
        match level {
            IceLevel::Unknown => self.border,
            IceLevel::Open => self.open,
            IceLevel::Light => self.light_ice,
            IceLevel::Heavy => self.heavy_ice,
            IceLevel::Extensive => self.extensive_ice,
        }
    }

    /// Get style for an ice level
    pub fn level_style(&self, level: IceLevel) -> Style {
        let style = Style::default().fg(self.level_color(level));
        match level {
            IceLevel::Extensive => style.add_modifier(Modifier::BOLD),
            IceLevel::Unknown => style.add_modifier(Modifier::DIM),
            _ => style,
        }
    }

    /// Style for a trend arrow; growing ice is highlighted.
    pub fn trend_style(&self, trend: Option<Trend>) -> Style {
        match trend {
            Some(Trend::Rising) => Style::default().fg(self.highlight),
            Some(Trend::Falling) => Style::default().fg(self.open),
            Some(Trend::Steady) => Style::default(),
            None => Style::default().add_modifier(Modifier::DIM),
        }
    }
}
