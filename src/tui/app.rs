//! Application state for the TUI.
//!
//! `App` owns the text of the search bar and hosts a `SearchInput`, feeding it
//! every text change and acting on the actions it raises. It is driven purely
//! by events and an explicit clock so the interactive loop and the headless
//! runner share it unchanged.

use super::events::Event;
use super::ui;
use super::widgets::spinner::Spinner;
use crate::error::Result;
use crate::geocoding::Suggestion;
use crate::search::{FetchRequest, SearchAction, SearchInput};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tracing::info;

/// How long an error toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Number of previously chosen places to remember.
pub const MAX_RECENT: usize = 5;

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Search,
    Place,
}

impl Focus {
    /// Cycles to the next focus panel.
    pub fn next(self) -> Self {
        match self {
            Self::Search => Self::Place,
            Self::Place => Self::Search,
        }
    }

    /// Name used in headless state dumps.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Place => "place",
        }
    }
}

/// State of the search bar text.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current input text.
    pub text: String,
    /// Cursor position (character index).
    pub cursor: usize,
}

impl InputState {
    /// Creates a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.text
            .char_indices()
            .nth(cursor)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    /// Deletes the character at the cursor (delete key).
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    /// Moves the cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Moves the cursor to the start of the input.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor to the end of the input.
    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Replaces the text and puts the cursor at its end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.char_len();
    }

    /// Returns true if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A transient message shown in the corner of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastMessage {
    pub message: String,
    pub expires_at: Instant,
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Current focus panel.
    pub focus: Focus,
    /// Search bar text.
    pub input: InputState,
    /// Suggestion state driven by `input`.
    pub search: SearchInput,
    /// The place picked most recently.
    pub chosen: Option<Suggestion>,
    /// Previously chosen places, newest first.
    pub recent: Vec<Suggestion>,
    /// Error toast, if one is showing.
    pub toast: Option<ToastMessage>,
    /// Geocoding provider description for the header.
    pub provider_info: String,
    /// Last known terminal size, used to hit-test pointer events.
    pub screen: Rect,
    /// Shown in the header while a lookup is outstanding.
    pub spinner: Spinner,
}

impl App {
    /// Creates a new App with the search bar focused.
    pub fn new(provider_info: impl Into<String>, debounce: Duration) -> Self {
        let mut search = SearchInput::new(debounce);
        search.focus();

        Self {
            running: true,
            focus: Focus::Search,
            input: InputState::new(),
            search,
            chosen: None,
            recent: Vec::new(),
            toast: None,
            provider_info: provider_info.into(),
            screen: Rect::default(),
            spinner: Spinner::searching(),
        }
    }

    /// Handles an event observed at `now` and updates application state.
    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    let row = ui::suggestion_row_at(self, mouse.column, mouse.row);
                    self.search.pointer_moved(row);
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    self.handle_click(mouse.column, mouse.row, now);
                }
                _ => {}
            },
            Event::Resize(width, height) => {
                self.resize(Rect::new(0, 0, width, height));
            }
            Event::Tick => {
                self.clear_expired_toast(now);
            }
        }
    }

    /// Records the screen size and how many suggestion rows fit on it.
    pub fn resize(&mut self, area: Rect) {
        self.screen = area;
        self.search.set_window(ui::suggestion_window(area));
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.running = false;
            }
            KeyCode::Tab => {
                self.set_focus(self.focus.next());
            }
            _ if self.focus == Focus::Search => {
                self.handle_search_key(key, now);
            }
            KeyCode::Char('/') if self.focus == Focus::Place => {
                self.set_focus(Focus::Search);
            }
            _ => {}
        }
    }

    /// Handles key events while the search bar is focused.
    ///
    /// Navigation keys go to the suggestion list first; editing keys change
    /// the text, which is then synced into the search state.
    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        if let Some(action) = self.search.handle_key(key.code) {
            self.apply_action(action, now);
            return;
        }

        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.insert(c);
            }
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => return,
        }
        self.sync_search(now);
    }

    fn handle_click(&mut self, column: u16, row: u16, now: Instant) {
        if let Some(index) = ui::suggestion_row_at(self, column, row) {
            if let Some(action) = self.search.click(index) {
                self.apply_action(action, now);
            }
            return;
        }

        let layout = ui::layout(self.screen);
        if ui::contains(layout.search, column, row) {
            self.set_focus(Focus::Search);
        } else if ui::contains(layout.body, column, row) {
            self.set_focus(Focus::Place);
        }
    }

    fn sync_search(&mut self, now: Instant) {
        self.search.set_value(&self.input.text, now);
    }

    /// Carries out an action raised by the search input.
    pub fn apply_action(&mut self, action: SearchAction, now: Instant) {
        match action {
            SearchAction::ChangeText(text) => {
                self.input.set(text);
                self.sync_search(now);
            }
            SearchAction::Select(place) => self.choose(place),
        }
    }

    fn choose(&mut self, place: Suggestion) {
        info!(id = %place.id, name = %place.display_name(), "Place chosen");
        self.recent.retain(|p| p.id != place.id);
        self.recent.insert(0, place.clone());
        self.recent.truncate(MAX_RECENT);
        self.chosen = Some(place);
        self.set_focus(Focus::Place);
    }

    /// Moves focus, keeping the search input's focus flag in step.
    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        match focus {
            Focus::Search => self.search.focus(),
            Focus::Place => self.search.blur(),
        }
    }

    /// Returns a fetch to start if the query settled by `now`.
    pub fn poll_search(&mut self, now: Instant) -> Option<FetchRequest> {
        self.search.poll(now)
    }

    /// Feeds a finished fetch back into the search state.
    pub fn apply_search_results(
        &mut self,
        seq: u64,
        result: Result<Vec<Suggestion>>,
        now: Instant,
    ) {
        if self.search.apply_results(seq, result) {
            if let Some(error) = self.search.take_error() {
                self.show_toast(error, now);
            }
        }
    }

    /// Shows a toast until `TOAST_DURATION` after `now`.
    pub fn show_toast(&mut self, message: impl Into<String>, now: Instant) {
        self.toast = Some(ToastMessage {
            message: message.into(),
            expires_at: now + TOAST_DURATION,
        });
    }

    /// Drops the toast once it has expired.
    pub fn clear_expired_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
        }
    }

    /// Current toast text, if any.
    pub fn toast_message(&self) -> Option<&str> {
        self.toast.as_ref().map(|t| t.message.as_str())
    }
}
