//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::duration::format_age;

/// Render the header bar with the basin-wide picture.
///
/// Displays: total coverage and level, observation date, endpoint in use.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(
                " GREAT LAKES ICE WATCH ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let total = data.total();
    let level_style = app.theme.level_style(total.level);
    let coverage = total
        .coverage
        .map(|v| format!("{:.1}%", v))
        .unwrap_or_else(|| "--".to_string());

    let mut spans = vec![
        Span::styled(" ● ", level_style),
        Span::styled("ICE WATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ basin "),
        Span::styled(coverage, level_style.add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(total.level.symbol(), level_style),
    ];

    if let Some(trend) = total.trend() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            trend.arrow(),
            app.theme.trend_style(Some(trend)),
        ));
    }

    spans.push(Span::raw(format!(
        " │ observed {} │ {}",
        data.latest.time.format("%Y-%m-%d"),
        data.endpoint
    )));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Lakes "),
        Line::from(" 2:Ranking "),
        Line::from(" 3:Trends "),
    ];

    let selected = match app.current_view {
        View::Lakes => 0,
        View::Ranking => 1,
        View::Trends => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Temporary status messages win, then fetch errors, then the normal
/// age-and-controls line.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let (status, style) = match (&app.data, &app.load_error) {
        (Some(data), error) => {
            let controls = if app.filter_active {
                "Type to search | Enter:apply Esc:cancel"
            } else {
                match app.current_view {
                    View::Ranking => "/:search s:sort S:reverse Enter:detail r:refresh ?:help q:quit",
                    View::Lakes | View::Trends => "/:search Enter:detail r:refresh ?:help q:quit",
                }
            };

            let mut status = format!(
                " {} | Updated {} ago",
                app.current_view.label(),
                format_age(data.last_updated.elapsed())
            );
            // A failed refresh keeps the previous data on screen
            if let Some(err) = error {
                status.push_str(&format!(" | Refresh failed: {}", err));
            } else if let Some(ref err) = data.history_error {
                status.push_str(&format!(" | No history: {}", err));
            }
            status.push_str(&format!(" | {}", controls));

            let style = if error.is_some() {
                Style::default().fg(app.theme.error)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            (status, style)
        }
        (None, Some(err)) => (
            format!(" Error: {} | r:retry q:quit", err),
            Style::default().fg(app.theme.error),
        ),
        (None, None) => (
            format!(" Loading from {}... | q:quit", app.source_description()),
            Style::default().add_modifier(Modifier::DIM),
        ),
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}

/// Render the help overlay with keyboard shortcuts.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  1 2 3       Lakes / Ranking / Trends"),
        Line::from("  ↑/↓ j/k     Select lake"),
        Line::from("  Home/End    First/last lake"),
        Line::from("  Enter       Lake detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Ranking"),
        Line::from("  s         Cycle sort column"),
        Line::from("  S         Toggle sort direction"),
        Line::from(""),
        section(" General"),
        Line::from("  /         Filter lakes"),
        Line::from("  c         Clear filter"),
        Line::from("  r         Refresh now"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Format a signed percentage-point change, e.g. `+3.2` or `-0.4`.
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(c) => format!("{:+.1}", c),
        None => "-".to_string(),
    }
}

/// Format a coverage percentage.
pub fn format_coverage(coverage: Option<f64>) -> String {
    match coverage {
        Some(v) => format!("{:.1}%", v),
        None => "--".to_string(),
    }
}

/// Block title with the active filter appended.
pub fn filter_suffix(app: &App) -> String {
    if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    }
}
