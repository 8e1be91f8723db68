//! Application state management for launchboard
//!
//! This module holds the interface state: which launch tab is selected, the
//! help overlay, and the quit flag. The launch data itself is an immutable
//! [`DataStore`] handed over at construction.

use crossterm::event::{KeyCode, KeyEvent};

use crate::store::DataStore;
use crate::ui::LaunchPanel;

/// Main application struct
pub struct App {
    /// Loaded launches (never refreshed while the app runs)
    store: DataStore,
    /// Number of launch tabs shown
    tab_count: usize,
    /// Index of the selected tab
    pub selected_tab: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
}

impl App {
    /// Creates an App showing at most `max_tabs` launches from `store`
    pub fn new(store: DataStore, max_tabs: usize) -> Self {
        let tab_count = store.results_len().min(max_tabs);
        Self {
            store,
            tab_count,
            selected_tab: 0,
            should_quit: false,
            show_help: false,
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Returns the number of launch tabs
    pub fn tab_count(&self) -> usize {
        self.tab_count
    }

    /// Returns the launch behind the selected tab, if any
    pub fn selected_launch(&self) -> Option<LaunchPanel<'_>> {
        if self.tab_count == 0 {
            return None;
        }
        LaunchPanel::load(&self.store, self.selected_tab).ok()
    }

    /// Moves to the next tab, wrapping around
    pub fn next_tab(&mut self) {
        if self.tab_count > 0 {
            self.selected_tab = (self.selected_tab + 1) % self.tab_count;
        }
    }

    /// Moves to the previous tab, wrapping around
    pub fn previous_tab(&mut self) {
        if self.tab_count > 0 {
            self.selected_tab = (self.selected_tab + self.tab_count - 1) % self.tab_count;
        }
    }

    /// Jumps to a tab by its 1-based label (`0` is tab 10)
    fn select_numbered_tab(&mut self, digit: char) {
        let Some(n) = digit.to_digit(10) else {
            return;
        };
        let idx = if n == 0 { 9 } else { n as usize - 1 };
        if idx < self.tab_count {
            self.selected_tab = idx;
        }
    }

    /// Handles keyboard input
    ///
    /// - `q` or `Esc`: Quit the application
    /// - `Right`/`l`/`Tab`: Next launch
    /// - `Left`/`h`/`BackTab`: Previous launch
    /// - `1`-`9`, `0`: Jump to launch tab
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                self.next_tab();
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                self.previous_tab();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.select_numbered_tab(c);
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LaunchRecord, LaunchWindow, ResultSet};
    use crossterm::event::KeyModifiers;

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn launch(n: usize) -> LaunchRecord {
        LaunchRecord {
            provider: format!("Provider {n}"),
            name: format!("Launch {n}"),
            status_abbrev: "TBD".to_string(),
            window: LaunchWindow {
                start: "2024-01-01T00:00:00Z".to_string(),
                end: "2024-01-01T01:00:00Z".to_string(),
            },
            mission_description: None,
            pad_longitude: "0".to_string(),
            pad_latitude: "0".to_string(),
        }
    }

    fn app_with(launches: usize, max_tabs: usize) -> App {
        let results = ResultSet::from((0..launches).map(launch).collect::<Vec<_>>());
        App::new(DataStore::from_results(results), max_tabs)
    }

    #[test]
    fn test_tab_count_is_capped() {
        assert_eq!(app_with(25, 10).tab_count(), 10);
        assert_eq!(app_with(3, 10).tab_count(), 3);
        assert_eq!(app_with(0, 10).tab_count(), 0);
    }

    #[test]
    fn test_navigation_wraps_around() {
        let mut app = app_with(3, 10);

        app.handle_key(key_event(KeyCode::Left));
        assert_eq!(app.selected_tab, 2);

        app.handle_key(key_event(KeyCode::Right));
        assert_eq!(app.selected_tab, 0);

        app.handle_key(key_event(KeyCode::Tab));
        app.handle_key(key_event(KeyCode::Char('l')));
        assert_eq!(app.selected_tab, 2);
    }

    #[test]
    fn test_number_keys_select_tabs() {
        let mut app = app_with(12, 10);

        app.handle_key(key_event(KeyCode::Char('4')));
        assert_eq!(app.selected_tab, 3);
        assert_eq!(app.selected_launch().unwrap().name, "Launch 3");

        app.handle_key(key_event(KeyCode::Char('0')));
        assert_eq!(app.selected_tab, 9);
    }

    #[test]
    fn test_number_key_past_last_tab_is_ignored() {
        let mut app = app_with(2, 10);

        app.handle_key(key_event(KeyCode::Char('5')));

        assert_eq!(app.selected_tab, 0);
    }

    #[test]
    fn test_empty_store_has_no_selection() {
        let mut app = app_with(0, 10);

        app.handle_key(key_event(KeyCode::Right));

        assert_eq!(app.selected_tab, 0);
        assert!(app.selected_launch().is_none());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with(1, 10);
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = app_with(1, 10);
        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = app_with(3, 10);

        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Right));
        assert_eq!(app.selected_tab, 0, "navigation is ignored under help");

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit, "q closes help before quitting");
    }
}
