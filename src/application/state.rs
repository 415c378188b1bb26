//! Application state management for the station counter.
//!
//! This module wraps the counting [`Session`] with the bits of UI state the
//! terminal front end needs: draft text for the count field, which name
//! field has focus, status messages, and the help overlay.

use crate::domain::{Phase, Session, SessionResult, SetupStage};
use crate::infrastructure::TallyExporter;
use tracing::warn;

/// Longest draft accepted in the station count field.
const COUNT_INPUT_MAX_LEN: usize = 4;

/// Represents the current mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// The active screen receives input
    Normal,
    /// Help screen is displayed
    Help,
}

/// Which screen is shown, derived from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Asking how many stations there are
    CountEntry,
    /// One text field per station
    NameEntry,
    /// Keypad and station list
    Counting,
}

/// Main application state containing the session and UI state.
///
/// # Examples
///
/// ```
/// use tally::application::{App, Screen};
///
/// let app = App::default();
/// assert_eq!(app.screen(), Screen::CountEntry);
/// assert!(app.count_input.is_empty());
/// ```
#[derive(Debug)]
pub struct App {
    /// Stations, tallies and the keypad buffer
    pub session: Session,
    /// Current application mode
    pub mode: AppMode,
    /// Draft text of the station count field
    pub count_input: String,
    /// Index of the name field with focus
    pub selected_name: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Target file for CSV export
    pub export_filename: String,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Session::default(), "tally.csv")
    }
}

impl App {
    pub fn new(session: Session, export_filename: &str) -> Self {
        Self {
            session,
            mode: AppMode::Normal,
            count_input: String::new(),
            selected_name: 0,
            status_message: None,
            help_scroll: 0,
            export_filename: export_filename.to_string(),
        }
    }

    pub fn screen(&self) -> Screen {
        match (self.session.phase(), self.session.setup_stage()) {
            (Phase::Counting, _) => Screen::Counting,
            (Phase::Setup, SetupStage::CountEntry) => Screen::CountEntry,
            (Phase::Setup, SetupStage::NameEntry) => Screen::NameEntry,
        }
    }

    /// Whether printable keys are typed as text on the current screen.
    pub fn accepts_text(&self) -> bool {
        self.mode == AppMode::Normal && self.screen() == Screen::NameEntry
    }

    /// The submit control on the count screen is enabled.
    pub fn can_submit_count(&self) -> bool {
        matches!(self.count_input.parse::<usize>(), Ok(n) if n > 0)
    }

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn push_count_digit(&mut self, digit: char) {
        if digit.is_ascii_digit() && self.count_input.len() < COUNT_INPUT_MAX_LEN {
            self.count_input.push(digit);
        }
    }

    pub fn pop_count_digit(&mut self) {
        self.count_input.pop();
    }

    pub fn clear_count_input(&mut self) {
        self.count_input.clear();
    }

    /// Creates the stations from the count field.
    pub fn submit_station_count(&mut self) {
        let n = self.count_input.parse::<usize>().unwrap_or(0);
        let result = self.session.set_station_count(n);
        if self.report(result) {
            self.selected_name = 0;
            self.status_message = Some(format!("{n} stations created, name each of them"));
        }
    }

    pub fn name_input_char(&mut self, c: char) {
        let Some(station) = self.session.stations().get(self.selected_name) else {
            return;
        };
        let mut name = station.name.clone();
        name.push(c);
        let result = self.session.set_station_name(self.selected_name, &name);
        self.report(result);
    }

    pub fn name_backspace(&mut self) {
        let Some(station) = self.session.stations().get(self.selected_name) else {
            return;
        };
        let mut name = station.name.clone();
        name.pop();
        let result = self.session.set_station_name(self.selected_name, &name);
        self.report(result);
    }

    pub fn next_name_field(&mut self) {
        let len = self.session.station_count();
        if len > 0 {
            self.selected_name = (self.selected_name + 1) % len;
        }
    }

    pub fn previous_name_field(&mut self) {
        let len = self.session.station_count();
        if len > 0 {
            self.selected_name = (self.selected_name + len - 1) % len;
        }
    }

    /// Enter on the name screen: start if every name is filled in, else move on.
    pub fn confirm_names(&mut self) {
        if self.session.can_start() {
            self.start_counting();
        } else {
            self.next_name_field();
        }
    }

    pub fn start_counting(&mut self) {
        let result = self.session.start_counting();
        if self.report(result) {
            self.status_message = None;
        }
    }

    /// Drops the station list and goes back to the count field.
    pub fn reconfigure(&mut self) {
        let result = self.session.reconfigure();
        if self.report(result) {
            self.count_input.clear();
            self.selected_name = 0;
        }
    }

    pub fn press_digit(&mut self, digit: char) {
        let result = self.session.input_digit(digit);
        self.report(result);
    }

    pub fn clear_input(&mut self) {
        self.session.clear_input();
    }

    pub fn backspace(&mut self) {
        self.session.backspace();
    }

    /// Adds the keypad value to the current station.
    pub fn commit(&mut self) {
        match self.session.commit() {
            Ok(Some(receipt)) => {
                let name = &self.session.stations()[receipt.station_index].name;
                self.status_message = Some(format!(
                    "+{} at {} (now {})",
                    receipt.added, name, receipt.total
                ));
            }
            Ok(None) => {}
            Err(e) => self.fail(e.to_string()),
        }
    }

    /// Back to the very first screen with nothing configured.
    pub fn reset_all(&mut self) {
        self.session.reset_all();
        self.count_input.clear();
        self.selected_name = 0;
        self.status_message = Some("Reset".to_string());
    }

    pub fn export_csv(&mut self) {
        if self.session.station_count() == 0 {
            self.fail("Nothing to export".to_string());
            return;
        }
        match TallyExporter::export_to_csv(self.session.stations(), &self.export_filename) {
            Ok(filename) => self.status_message = Some(format!("Exported to {filename}")),
            Err(e) => self.fail(format!("Export failed: {e}")),
        }
    }

    /// Shows a rejected operation in the status bar. Returns whether `result` was `Ok`.
    fn report(&mut self, result: SessionResult<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                self.fail(e.to_string());
                false
            }
        }
    }

    fn fail(&mut self, message: String) {
        warn!("{message}");
        self.status_message = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_names(names: &[&str]) -> App {
        let mut app = App::default();
        for c in names.len().to_string().chars() {
            app.push_count_digit(c);
        }
        app.submit_station_count();
        for (i, name) in names.iter().enumerate() {
            app.selected_name = i;
            for c in name.chars() {
                app.name_input_char(c);
            }
        }
        app
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.screen(), Screen::CountEntry);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.count_input.is_empty());
        assert!(app.status_message.is_none());
        assert_eq!(app.export_filename, "tally.csv");
        assert!(!app.can_submit_count());
    }

    #[test]
    fn test_count_field_accepts_digits_only() {
        let mut app = App::default();
        app.push_count_digit('a');
        app.push_count_digit('1');
        app.push_count_digit('2');
        assert_eq!(app.count_input, "12");

        for _ in 0..5 {
            app.push_count_digit('9');
        }
        assert_eq!(app.count_input.len(), COUNT_INPUT_MAX_LEN);

        app.pop_count_digit();
        assert_eq!(app.count_input, "129");
    }

    #[test]
    fn test_submit_zero_stays_on_count_screen() {
        let mut app = App::default();
        app.push_count_digit('0');
        assert!(!app.can_submit_count());

        app.submit_station_count();
        assert_eq!(app.screen(), Screen::CountEntry);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_submit_above_cap_is_reported() {
        let mut app = App::new(Session::with_max_stations(3), "out.csv");
        app.push_count_digit('4');
        app.submit_station_count();

        assert_eq!(app.screen(), Screen::CountEntry);
        assert!(app.status_message.as_deref().unwrap().contains("at most 3"));
    }

    #[test]
    fn test_name_entry_flow() {
        let mut app = app_with_names(&["North", ""]);
        assert_eq!(app.screen(), Screen::NameEntry);

        app.selected_name = 0;
        app.confirm_names();
        assert_eq!(app.selected_name, 1);
        assert_eq!(app.screen(), Screen::NameEntry);

        app.name_input_char('D');
        app.name_input_char('x');
        app.name_backspace();
        assert_eq!(app.session.stations()[1].name, "D");

        app.confirm_names();
        assert_eq!(app.screen(), Screen::Counting);
    }

    #[test]
    fn test_name_field_navigation_wraps() {
        let mut app = app_with_names(&["", "", ""]);
        app.selected_name = 0;
        app.previous_name_field();
        assert_eq!(app.selected_name, 2);
        app.next_name_field();
        assert_eq!(app.selected_name, 0);
    }

    #[test]
    fn test_start_counting_with_blank_name_is_reported() {
        let mut app = app_with_names(&["A", " "]);
        app.start_counting();
        assert_eq!(app.screen(), Screen::NameEntry);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_reconfigure_clears_stations() {
        let mut app = app_with_names(&["A", "B"]);
        app.reconfigure();
        assert_eq!(app.screen(), Screen::CountEntry);
        assert!(app.count_input.is_empty());
        assert_eq!(app.session.station_count(), 0);
    }

    #[test]
    fn test_keypad_commit_cycle() {
        let mut app = app_with_names(&["A", "B"]);
        app.start_counting();

        app.press_digit('7');
        app.commit();
        assert_eq!(app.session.stations()[0].count, 7);
        assert_eq!(app.status_message.as_deref(), Some("+7 at A (now 7)"));

        app.press_digit('3');
        app.commit();
        assert_eq!(app.session.current_station_index(), 0);

        app.status_message = None;
        app.commit();
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_reset_all_returns_to_count_entry() {
        let mut app = app_with_names(&["A"]);
        app.start_counting();
        app.press_digit('4');
        app.reset_all();

        assert_eq!(app.screen(), Screen::CountEntry);
        assert_eq!(app.session.station_count(), 0);
        assert!(app.session.pending_input().is_empty());
    }

    #[test]
    fn test_export_csv_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.csv");
        let mut app = app_with_names(&["A", "B"]);
        app.export_filename = path.to_str().unwrap().to_string();

        app.export_csv();
        assert!(path.exists());
        assert!(app.status_message.as_deref().unwrap().starts_with("Exported to"));
    }

    #[test]
    fn test_export_without_stations() {
        let mut app = App::default();
        app.export_csv();
        assert_eq!(app.status_message.as_deref(), Some("Nothing to export"));
    }
}
