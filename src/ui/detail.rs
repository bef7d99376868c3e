//! Detail overlay rendering.
//!
//! Displays a modal overlay with everything known about the selected lake.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::common::{format_change, format_coverage};
use crate::app::App;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;
/// Most recent readings listed in the overlay.
const RECENT_READINGS: usize = 10;

/// Render the lake detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(ref data) = app.data else {
        return;
    };
    let Some(lake) = app.selected_lake() else {
        return;
    };
    let summary = data.lake(lake);

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 80 / 100).clamp(MIN_OVERLAY_HEIGHT, 30);
    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(7), // Figures
        Constraint::Min(5),    // Recent readings
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    let level_style = app.theme.level_style(summary.level);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let trend = summary.trend();

    let rank = match summary.rank {
        Some(r) => format!("#{} of 5", r),
        None => "basin total".to_string(),
    };
    let extremes = data
        .trends
        .extremes(lake)
        .map(|(lo, hi)| format!("{:.1}% – {:.1}%", lo, hi))
        .unwrap_or_else(|| "-".to_string());

    let header_lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", lake.label()), bold),
            Span::styled(summary.level.symbol(), level_style),
            Span::raw(format!("  ({})", rank)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Coverage: "),
            Span::styled(format_coverage(summary.coverage), level_style.add_modifier(Modifier::BOLD)),
            Span::raw("    7d: "),
            Span::styled(
                format!(
                    "{} {}",
                    format_change(summary.change_7d),
                    trend.map_or("", |t| t.arrow())
                ),
                app.theme.trend_style(trend),
            ),
            Span::raw("    30d: "),
            Span::styled(format_change(summary.change_30d), bold),
        ]),
        Line::from(vec![
            Span::raw(" Range: "),
            Span::styled(extremes, bold),
            Span::raw(format!("    Points: {}", data.trends.len(lake))),
        ]),
        Line::from(vec![
            Span::raw(" Observed: "),
            Span::raw(data.latest.time.format("%Y-%m-%d %H:%M UTC").to_string()),
        ]),
    ];

    let header_block = Block::default()
        .title(" Lake Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));
    frame.render_widget(Paragraph::new(header_lines).block(header_block), chunks[0]);

    // Newest first
    let readings: Vec<Row> = data
        .trends
        .points(lake)
        .iter()
        .rev()
        .take(RECENT_READINGS)
        .map(|(time, value)| {
            Row::new(vec![
                Cell::from(time.format("%Y-%m-%d").to_string()),
                Cell::from(format_coverage(Some(*value))),
            ])
        })
        .collect();

    let readings_block = Block::default()
        .title(format!(" Recent readings ({}) ", readings.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if readings.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No history for this lake",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(readings_block);
        frame.render_widget(empty, chunks[1]);
    } else {
        let header = Row::new(vec![Cell::from("Date"), Cell::from("Coverage")])
            .height(1)
            .style(app.theme.header);
        let table = Table::new(readings, [Constraint::Length(12), Constraint::Fill(1)])
            .header(header)
            .block(readings_block);
        frame.render_widget(table, chunks[1]);
    }

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " ↑↓:lake  Esc:close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[2]);
}
