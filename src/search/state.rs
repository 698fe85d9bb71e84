//! Search input state machine.
//!
//! `SearchInput` tracks the parent's text, debounces it into fetch requests,
//! holds the latest suggestion list, and moves a selection cursor over it in
//! response to keyboard and pointer input. It performs no I/O: fetches are
//! handed out as `FetchRequest`s and their outcomes fed back through
//! `apply_results`.

use crossterm::event::KeyCode;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::DEFAULT_DEBOUNCE_MS;
use crate::error::{GeoSearchError, Result};
use crate::geocoding::Suggestion;
use crate::search::debounce::Debouncer;

/// A suggestion fetch the host should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Monotonically increasing tag; results are matched back by it.
    pub seq: u64,
    /// Debounced query text (never empty).
    pub query: String,
}

/// Something the widget asks its parent to do.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    /// Replace the query text with this value.
    ChangeText(String),
    /// The user picked this suggestion.
    Select(Suggestion),
}

/// State of the search widget.
#[derive(Debug, Clone)]
pub struct SearchInput {
    debouncer: Debouncer,
    /// Query text as last synced from the parent.
    value: String,
    focused: bool,
    suggestions: Vec<Suggestion>,
    /// Always indexes into `suggestions` when present.
    selected: Option<usize>,
    /// Row currently under the pointer.
    hovered: Option<usize>,
    /// Rows the host shows at once; 0 disables scrolling.
    window: usize,
    /// First visible row. Only moves when the selection leaves the window.
    scroll: usize,
    /// Tag of the last request handed out.
    last_seq: u64,
    /// Tag of the request whose results will be accepted.
    awaiting: Option<u64>,
    last_query: Option<String>,
    error: Option<String>,
}

impl Default for SearchInput {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl SearchInput {
    /// Creates an unfocused, empty search input with the given debounce delay.
    pub fn new(debounce: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(debounce),
            value: String::new(),
            focused: false,
            suggestions: Vec::new(),
            selected: None,
            hovered: None,
            window: 0,
            scroll: 0,
            last_seq: 0,
            awaiting: None,
            last_query: None,
            error: None,
        }
    }

    // --- Text and fetching ---

    /// Syncs the parent's current text into the widget.
    ///
    /// Empty text clears the suggestions at once and orphans any outstanding
    /// request; anything else starts (or restarts) the quiet period.
    pub fn set_value(&mut self, value: &str, now: Instant) {
        if value == self.value {
            return;
        }
        self.value = value.to_string();

        if value.is_empty() {
            self.debouncer.flush("");
            self.clear_suggestions();
            if let Some(seq) = self.awaiting.take() {
                debug!(seq, "Query cleared; results of outstanding request will be dropped");
            }
            return;
        }

        self.debouncer.update(value, now);
    }

    /// Advances the debounce timer, returning a request once the text settles.
    pub fn poll(&mut self, now: Instant) -> Option<FetchRequest> {
        let query = self.debouncer.poll(now)?;
        if query.is_empty() {
            self.clear_suggestions();
            return None;
        }

        self.last_seq += 1;
        self.awaiting = Some(self.last_seq);
        self.last_query = Some(query.clone());
        debug!(seq = self.last_seq, query = %query, "Query settled, fetching suggestions");

        Some(FetchRequest {
            seq: self.last_seq,
            query,
        })
    }

    /// Returns when `poll` next needs to run, if a value is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Feeds back the outcome of a fetch.
    ///
    /// Only the most recently issued request is applied; anything older is
    /// dropped. Returns true if the outcome was applied.
    pub fn apply_results(&mut self, seq: u64, result: Result<Vec<Suggestion>>) -> bool {
        if self.awaiting != Some(seq) {
            debug!(seq, latest = self.last_seq, "Dropping stale suggestions");
            return false;
        }
        self.awaiting = None;

        match result {
            Ok(suggestions) => {
                debug!(seq, count = suggestions.len(), "Applying suggestions");
                self.replace_suggestions(suggestions);
            }
            Err(GeoSearchError::MalformedResponse(msg)) => {
                warn!(seq, error = %msg, "Malformed geocoding response, treating as no results");
                self.replace_suggestions(Vec::new());
            }
            Err(e) => {
                warn!(seq, error = %e, "Suggestion fetch failed, keeping previous results");
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Takes the last fetch error, if one has not been reported yet.
    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }

    fn replace_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.selected = if suggestions.is_empty() { None } else { Some(0) };
        self.suggestions = suggestions;
        self.hovered = None;
        self.scroll = 0;
        self.error = None;
    }

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.selected = None;
        self.hovered = None;
        self.scroll = 0;
    }

    // --- Scrolling ---

    /// Sets how many rows the host can show at once.
    pub fn set_window(&mut self, rows: usize) {
        self.window = rows;
        self.scroll_to_selection();
    }

    /// Index of the first visible row.
    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// Moves the window just far enough to show the selection.
    fn scroll_to_selection(&mut self) {
        let len = self.suggestions.len();
        if self.window == 0 || len <= self.window {
            self.scroll = 0;
            return;
        }
        self.scroll = self.scroll.min(len - self.window);
        if let Some(i) = self.selected {
            if i < self.scroll {
                self.scroll = i;
            } else if i >= self.scroll + self.window {
                self.scroll = i + 1 - self.window;
            }
        }
    }

    // --- Focus ---

    /// Gives the input focus and resets the cursor to the first row.
    pub fn focus(&mut self) {
        self.focused = true;
        self.selected = if self.suggestions.is_empty() {
            None
        } else {
            Some(0)
        };
        self.scroll_to_selection();
    }

    /// Removes focus; the selection is kept.
    pub fn blur(&mut self) {
        self.focused = false;
        self.hovered = None;
    }

    // --- Keyboard ---

    /// Handles a key press while the input has focus.
    ///
    /// Only Esc, Enter, Up and Down are meaningful here; text editing keys
    /// travel the parent's change path instead.
    pub fn handle_key(&mut self, code: KeyCode) -> Option<SearchAction> {
        match code {
            KeyCode::Esc => Some(SearchAction::ChangeText(String::new())),
            KeyCode::Enter => self.selected_suggestion().cloned().map(SearchAction::Select),
            KeyCode::Up => {
                self.step(-1);
                None
            }
            KeyCode::Down => {
                self.step(1);
                None
            }
            _ => None,
        }
    }

    /// Moves the cursor by `delta`, clamped to the list; no wraparound.
    fn step(&mut self, delta: isize) {
        if self.suggestions.is_empty() {
            self.selected = None;
            return;
        }
        let last = self.suggestions.len() as isize - 1;
        self.selected = Some(match self.selected {
            None => 0,
            Some(i) => (i as isize + delta).clamp(0, last) as usize,
        });
        self.scroll_to_selection();
    }

    // --- Pointer ---

    /// The pointer entered row `index`.
    pub fn hover(&mut self, index: usize) {
        if index < self.suggestions.len() {
            self.hovered = Some(index);
            self.selected = Some(index);
        }
    }

    /// The pointer left row `index`.
    pub fn leave(&mut self, index: usize) {
        if index >= self.suggestions.len() {
            return;
        }
        if self.hovered == Some(index) {
            self.hovered = None;
        }
        self.selected = None;
    }

    /// Translates pointer motion into leave/enter transitions.
    ///
    /// `row` is the suggestion row under the pointer, if any. Staying on the
    /// same row is not a transition.
    pub fn pointer_moved(&mut self, row: Option<usize>) {
        let row = row.filter(|&i| i < self.suggestions.len());
        if row == self.hovered {
            return;
        }
        if let Some(previous) = self.hovered {
            self.leave(previous);
        }
        if let Some(index) = row {
            self.hover(index);
        }
    }

    /// The user clicked row `index`.
    pub fn click(&self, index: usize) -> Option<SearchAction> {
        self.suggestions
            .get(index)
            .cloned()
            .map(SearchAction::Select)
    }

    // --- Accessors ---

    /// Whether the suggestion panel should be shown.
    pub fn is_open(&self) -> bool {
        self.focused && !self.value.is_empty() && !self.suggestions.is_empty()
    }

    /// Query text as last synced.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the input has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Current suggestion list.
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Current cursor position.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Suggestion under the cursor.
    pub fn selected_suggestion(&self) -> Option<&Suggestion> {
        self.selected.and_then(|i| self.suggestions.get(i))
    }

    /// Row under the pointer.
    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered
    }

    /// Whether the latest request is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.awaiting.is_some()
    }

    /// Number of requests handed out so far.
    pub fn requests_issued(&self) -> u64 {
        self.last_seq
    }

    /// Query of the most recent request.
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Whether a changed value is still inside its quiet period.
    pub fn is_debouncing(&self) -> bool {
        self.debouncer.is_pending()
    }
}
