//! Trends view rendering.
//!
//! A sparkline panel per lake over the fetched history window.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline as SparklineWidget},
    Frame,
};

use super::common::{filter_suffix, format_coverage};
use crate::app::App;

/// Bars are tenths of a percentage point.
const BAR_SCALE: f64 = 10.0;
/// Rows taken by one panel: two of sparkline plus borders.
pub(crate) const PANEL_HEIGHT: u16 = 4;

/// Render the Trends view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let lakes = app.visible_lakes();
    if lakes.is_empty() || data.trends.is_empty() {
        let message = if lakes.is_empty() {
            " No lakes match the filter".to_string()
        } else {
            match data.history_error {
                Some(ref err) => format!(" History unavailable: {}", err),
                None => " No history loaded".to_string(),
            }
        };
        let block = Block::default()
            .title(format!(" Trends{} ", filter_suffix(app)))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let rows = Layout::vertical(
        lakes
            .iter()
            .map(|_| Constraint::Length(PANEL_HEIGHT))
            .chain(std::iter::once(Constraint::Min(0))),
    )
    .split(area);

    let span = data
        .trends
        .span()
        .map(|(from, to)| format!("{} → {}", from.format("%m-%d"), to.format("%m-%d")))
        .unwrap_or_default();

    for (i, lake) in lakes.iter().enumerate() {
        let summary = data.lake(*lake);
        let selected = i == app.selected_index;
        let border_style = if selected {
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.border)
        };

        let extremes = data
            .trends
            .extremes(*lake)
            .map(|(lo, hi)| format!(" min {:.1} max {:.1}", lo, hi))
            .unwrap_or_default();

        let title = Line::from(vec![
            Span::raw(if selected { " ▶ " } else { " " }),
            Span::styled(lake.label(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(
                format_coverage(summary.coverage),
                app.theme.level_style(summary.level),
            ),
            Span::styled(extremes, Style::default().add_modifier(Modifier::DIM)),
            Span::raw(" "),
        ]);

        let block = Block::default()
            .title(title)
            .title_bottom(Line::from(format!(" {} ", span)).right_aligned())
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(border_style);

        // Keep the most recent points that fit inside the borders
        let bars = data.trends.sparkline(*lake).bars(BAR_SCALE);
        let inner_width = rows[i].width.saturating_sub(2) as usize;
        let visible = &bars[bars.len().saturating_sub(inner_width)..];

        let sparkline = SparklineWidget::default()
            .block(block)
            .data(visible)
            .max((100.0 * BAR_SCALE) as u64)
            .style(Style::default().fg(app.theme.level_color(summary.level)));

        frame.render_widget(sparkline, rows[i]);
    }
}
