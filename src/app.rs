//! Application state and navigation logic.

use std::path::Path;

use anyhow::Result;

use crate::data::{IceData, Lake, LakeSummary};
use crate::source::DataSource;
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Lake detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Fill gauge per lake plus the basin total.
    Lakes,
    /// Lakes ordered by coverage with change figures.
    Ranking,
    /// History sparkline per lake.
    Trends,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Lakes => View::Ranking,
            View::Ranking => View::Trends,
            View::Trends => View::Lakes,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Lakes => View::Trends,
            View::Ranking => View::Lakes,
            View::Trends => View::Ranking,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Lakes => "Lakes",
            View::Ranking => "Ranking",
            View::Trends => "Trends",
        }
    }
}

/// Column to sort by in the Ranking view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Sort by coverage rank.
    #[default]
    Rank,
    /// Sort by lake name alphabetically.
    Name,
    /// Sort by 7-day change.
    Change,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Rank => SortColumn::Name,
            SortColumn::Name => SortColumn::Change,
            SortColumn::Change => SortColumn::Rank,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Rank => "rank",
            SortColumn::Name => "name",
            SortColumn::Change => "change",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub data: Option<IceData>,
    pub load_error: Option<String>,

    // Navigation state
    pub selected_index: usize,

    // Sorting (Ranking view)
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,
}

impl App {
    /// Create a new App with the given data source.
    pub fn new(source: Box<dyn DataSource>) -> Self {
        Self::with_theme(source, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme (skips terminal detection).
    pub fn with_theme(source: Box<dyn DataSource>, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Lakes,
            show_help: false,
            show_detail_overlay: false,
            source,
            data: None,
            load_error: None,
            selected_index: 0,
            sort_column: SortColumn::default(),
            sort_ascending: true,
            filter_text: String::new(),
            filter_active: false,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for new data.
    ///
    /// Returns true if new data was received.
    pub fn reload_data(&mut self) -> bool {
        if let Some(snapshot) = self.source.poll() {
            self.data = Some(IceData::from_snapshot(snapshot));
            self.load_error = None;
            self.clamp_selection();
            return true;
        }

        // Keep showing the last good data; the error goes to the status bar
        self.load_error = self.source.error();
        false
    }

    /// Ask the source to fetch now.
    pub fn request_refresh(&mut self) {
        self.source.refresh();
        self.set_status_message("Refreshing...".to_string());
    }

    /// Lakes shown by the current view, in display order.
    pub fn visible_lakes(&self) -> Vec<Lake> {
        let Some(ref data) = self.data else {
            return Vec::new();
        };

        match self.current_view {
            View::Lakes | View::Trends => Lake::ALL
                .into_iter()
                .filter(|lake| self.matches_filter(lake.label()))
                .collect(),
            View::Ranking => {
                let mut lakes: Vec<&LakeSummary> = data
                    .individual_lakes()
                    .iter()
                    .filter(|s| self.matches_filter(s.lake.label()))
                    .collect();
                sort_lakes_by(&mut lakes, self.sort_column, self.sort_ascending);
                lakes.into_iter().map(|s| s.lake).collect()
            }
        }
    }

    /// The lake under the cursor.
    pub fn selected_lake(&self) -> Option<Lake> {
        self.visible_lakes().get(self.selected_index).copied()
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_lakes().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    /// Switch to the next view (cycles through Lakes → Ranking → Trends).
    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.selected_index = 0;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.visible_lakes().len().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    /// Select the item at a visual index, if it exists.
    pub fn select_index(&mut self, index: usize) {
        if index < self.visible_lakes().len() {
            self.selected_index = index;
        }
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.selected_index = self.visible_lakes().len().saturating_sub(1);
    }

    /// Open the detail overlay for the currently selected lake.
    pub fn enter_detail(&mut self) {
        if self.selected_lake().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then return to the Lakes view.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if self.current_view != View::Lakes {
            self.set_view(View::Lakes);
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle to the next sort column (Ranking view).
    pub fn cycle_sort(&mut self) {
        if self.current_view == View::Ranking {
            self.sort_column = self.sort_column.next();
        }
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        if self.current_view == View::Ranking {
            self.sort_ascending = !self.sort_ascending;
        }
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.clamp_selection();
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Check if a lake name matches the current filter.
    pub fn matches_filter(&self, name: &str) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        name.to_lowercase().contains(&self.filter_text.to_lowercase())
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };

        let json = serde_json::to_string_pretty(&data.summary_json())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Sort lake summaries by the given column and direction.
///
/// "Ascending" for rank means best (rank 1) first.
pub fn sort_lakes_by(lakes: &mut [&LakeSummary], column: SortColumn, ascending: bool) {
    lakes.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Rank => a
                .rank
                .unwrap_or(usize::MAX)
                .cmp(&b.rank.unwrap_or(usize::MAX)),
            SortColumn::Name => a.lake.label().cmp(b.lake.label()),
            SortColumn::Change => {
                let a_change = a.change_7d.unwrap_or(f64::NEG_INFINITY);
                let b_change = b.change_7d.unwrap_or(f64::NEG_INFINITY);
                a_change.total_cmp(&b_change)
            }
        };

        // Apply direction to primary comparison
        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        // Use secondary sort by lake order for stability when primary values are equal
        primary.then_with(|| a.lake.cmp(&b.lake))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Observation;
    use crate::source::{ChannelSource, IceSnapshot};
    use chrono::{Duration, TimeZone, Utc};

    fn snapshot() -> IceSnapshot {
        let now = Utc.with_ymd_and_hms(2024, 2, 20, 12, 0, 0).unwrap();
        let week_ago = Observation::new(now - Duration::days(7))
            .with(Lake::Superior, 30.0)
            .with(Lake::Michigan, 10.0)
            .with(Lake::Huron, 20.0)
            .with(Lake::Erie, 90.0)
            .with(Lake::Ontario, 5.0)
            .with(Lake::Total, 25.0);
        let latest = Observation::new(now)
            .with(Lake::Superior, 40.0)
            .with(Lake::Michigan, 12.0)
            .with(Lake::Huron, 25.0)
            .with(Lake::Erie, 80.0)
            .with(Lake::Ontario, 6.0)
            .with(Lake::Total, 30.0);
        IceSnapshot {
            latest: latest.clone(),
            history: vec![week_ago, latest],
            endpoint: "test".to_string(),
            history_error: None,
            fetched_at: now,
        }
    }

    fn loaded_app() -> App {
        let (tx, source) = ChannelSource::create("test");
        tx.send(Some(snapshot())).unwrap();
        let mut app = App::with_theme(Box::new(source), Theme::dark());
        assert!(app.reload_data());
        app
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Lakes.next(), View::Ranking);
        assert_eq!(View::Trends.next(), View::Lakes);
        assert_eq!(View::Lakes.prev(), View::Trends);
    }

    #[test]
    fn test_reload_without_data() {
        let (_tx, source) = ChannelSource::create("test");
        let mut app = App::with_theme(Box::new(source), Theme::dark());
        assert!(!app.reload_data());
        assert!(app.data.is_none());
        assert!(app.visible_lakes().is_empty());
    }

    #[test]
    fn test_lakes_view_lists_all_columns() {
        let app = loaded_app();
        assert_eq!(app.visible_lakes(), Lake::ALL.to_vec());
        assert_eq!(app.selected_lake(), Some(Lake::Superior));
    }

    #[test]
    fn test_ranking_view_orders_by_rank() {
        let mut app = loaded_app();
        app.set_view(View::Ranking);
        assert_eq!(
            app.visible_lakes(),
            vec![Lake::Erie, Lake::Superior, Lake::Huron, Lake::Michigan, Lake::Ontario]
        );

        app.toggle_sort_direction();
        assert_eq!(app.visible_lakes()[0], Lake::Ontario);

        app.toggle_sort_direction();
        app.cycle_sort();
        assert_eq!(app.sort_column, SortColumn::Name);
        assert_eq!(app.visible_lakes()[0], Lake::Erie);

        app.cycle_sort();
        assert_eq!(app.sort_column, SortColumn::Change);
        // Erie fell 10 points, the largest drop
        assert_eq!(app.visible_lakes()[0], Lake::Erie);
        assert_eq!(app.visible_lakes()[4], Lake::Superior);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut app = loaded_app();
        app.select_next_n(100);
        assert_eq!(app.selected_index, 5);
        app.select_prev_n(100);
        assert_eq!(app.selected_index, 0);
        app.select_last();
        assert_eq!(app.selected_lake(), Some(Lake::Total));
    }

    #[test]
    fn test_filter_narrows_lakes() {
        let mut app = loaded_app();
        app.select_last();
        for c in "eri".chars() {
            app.filter_push(c);
        }
        assert_eq!(app.visible_lakes(), vec![Lake::Superior, Lake::Erie]);
        assert_eq!(app.selected_index, 1);

        app.clear_filter();
        assert_eq!(app.visible_lakes().len(), 6);
    }

    #[test]
    fn test_detail_and_back() {
        let mut app = loaded_app();
        app.set_view(View::Trends);
        app.enter_detail();
        assert!(app.show_detail_overlay);

        app.go_back();
        assert!(!app.show_detail_overlay);
        assert_eq!(app.current_view, View::Trends);

        app.go_back();
        assert_eq!(app.current_view, View::Lakes);
    }

    #[test]
    fn test_export_state() {
        let app = loaded_app();
        let file = tempfile::NamedTempFile::new().unwrap();
        app.export_state(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["ranking"][0]["lake"], "Erie");
    }

    #[test]
    fn test_export_without_data_fails() {
        let (_tx, source) = ChannelSource::create("test");
        let app = App::with_theme(Box::new(source), Theme::dark());
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(app.export_state(file.path()).is_err());
    }
}
