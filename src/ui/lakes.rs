//! Lakes view rendering.
//!
//! One fill gauge per lake, the basin total last.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::common::{filter_suffix, format_change, format_coverage};
use crate::app::App;

/// Rows taken by a single gauge (bordered).
pub(crate) const GAUGE_HEIGHT: u16 = 3;

/// Render the Lakes view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let lakes = app.visible_lakes();
    if lakes.is_empty() {
        let block = Block::default()
            .title(format!(" Lakes{} ", filter_suffix(app)))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        frame.render_widget(Paragraph::new(" No lakes match the filter").block(block), area);
        return;
    }

    let rows = Layout::vertical(
        lakes
            .iter()
            .map(|_| Constraint::Length(GAUGE_HEIGHT))
            .chain(std::iter::once(Constraint::Min(0))),
    )
    .split(area);

    for (i, lake) in lakes.iter().enumerate() {
        let summary = data.lake(*lake);
        let selected = i == app.selected_index;
        let level_style = app.theme.level_style(summary.level);

        let border_style = if selected {
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.border)
        };

        let trend = summary.trend();
        let title = Line::from(vec![
            Span::raw(if selected { " ▶ " } else { " " }),
            Span::styled(lake.label(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(summary.level.symbol(), level_style),
            Span::raw(" "),
            Span::styled(
                trend.map_or("", |t| t.arrow()),
                app.theme.trend_style(trend),
            ),
            Span::raw(format!(" 7d {} ", format_change(summary.change_7d))),
        ]);

        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_type(app.theme.border_type)
                    .border_style(border_style),
            )
            .gauge_style(Style::default().fg(app.theme.level_color(summary.level)))
            .ratio(summary.fill())
            .label(format_coverage(summary.coverage));

        frame.render_widget(gauge, rows[i]);
    }
}
