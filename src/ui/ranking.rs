//! Ranking view rendering.
//!
//! A sortable table of the five lakes with coverage bars, change figures
//! and a short block sparkline of recent history.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::common::{filter_suffix, format_change, format_coverage};
use crate::app::{App, SortColumn};

/// Width of the inline coverage bar, in cells.
const BAR_WIDTH: usize = 20;
/// Number of history points shown in the trend column.
const TREND_WIDTH: usize = 12;

/// Render the Ranking view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let lakes = app.visible_lakes();

    let header = Row::new(vec![
        Cell::from(format_header("#", SortColumn::Rank, app)),
        Cell::from(format_header("Lake", SortColumn::Name, app)),
        Cell::from("Coverage"),
        Cell::from(""),
        Cell::from(format_header("7d", SortColumn::Change, app)),
        Cell::from("30d"),
        Cell::from("Trend"),
        Cell::from("Level"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = lakes
        .iter()
        .map(|&lake| {
            let summary = data.lake(lake);
            let level_style = app.theme.level_style(summary.level);
            let sparkline = data.trends.sparkline(lake).render_blocks(TREND_WIDTH);
            let trend = summary.trend();

            Row::new(vec![
                Cell::from(
                    summary
                        .rank
                        .map(|r| r.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(lake.label()),
                Cell::from(format_coverage(summary.coverage)).style(level_style),
                Cell::from(coverage_bar(summary.fill(), BAR_WIDTH)).style(level_style),
                Cell::from(format!(
                    "{} {}",
                    format_change(summary.change_7d),
                    trend.map_or("", |t| t.arrow())
                ))
                .style(app.theme.trend_style(trend)),
                Cell::from(format_change(summary.change_30d)),
                Cell::from(sparkline),
                Cell::from(summary.level.symbol()).style(level_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Fill(2),
        Constraint::Length(9),
        Constraint::Length(BAR_WIDTH as u16),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Min(TREND_WIDTH as u16),
        Constraint::Min(6),
    ];

    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };
    let position_info = if !lakes.is_empty() {
        format!(
            " [{}/{}]",
            app.selected_index.min(lakes.len() - 1) + 1,
            lakes.len()
        )
    } else {
        String::new()
    };

    let title = format!(
        " Ranking [s:sort {}{}]{}{} ",
        app.sort_column.label(),
        sort_dir,
        filter_suffix(app),
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !lakes.is_empty() {
        state.select(Some(app.selected_index.min(lakes.len() - 1)));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Horizontal bar `width` cells wide, filled to `fill` (0..=1).
fn coverage_bar(fill: f64, width: usize) -> String {
    let filled = (fill.clamp(0.0, 1.0) * width as f64).round() as usize;
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(width - filled));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_bar() {
        assert_eq!(coverage_bar(0.0, 4), "░░░░");
        assert_eq!(coverage_bar(0.5, 4), "██░░");
        assert_eq!(coverage_bar(1.0, 4), "████");
        assert_eq!(coverage_bar(2.0, 4), "████");
    }
}
