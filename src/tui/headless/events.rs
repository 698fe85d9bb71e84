//! Event DSL parser for headless mode.
//!
//! Parses event strings like "type:paris", "key:down", "wait:600ms" and
//! "hover:1" into executable events.

use crate::error::{GeoSearchError, Result};
use crate::tui::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;
use std::time::Duration;

/// An assertion to check against the screen or state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    /// Screen contains text (case-insensitive).
    Contains(String),
    /// Screen contains text (case-sensitive).
    ContainsExact(String),
    /// Screen does not contain text.
    NotContains(String),
    /// Screen matches regex pattern.
    Matches(String),
    /// State field equals value.
    StateEquals { field: String, value: String },
    /// State field comparison (>=, <=, >, <).
    StateCompare {
        field: String,
        op: String,
        value: String,
    },
}

impl Assertion {
    /// Checks the assertion against the screen and app state.
    pub fn check(&self, screen: &str, app: &App) -> bool {
        match self {
            Self::Contains(text) => screen.to_lowercase().contains(&text.to_lowercase()),
            Self::ContainsExact(text) => screen.contains(text),
            Self::NotContains(text) => !screen.to_lowercase().contains(&text.to_lowercase()),
            Self::Matches(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(screen))
                .unwrap_or(false),
            Self::StateEquals { field, value } => {
                let actual = get_state_field(app, field);
                actual.as_deref() == Some(value.as_str())
            }
            Self::StateCompare { field, op, value } => {
                let actual = get_state_field(app, field);
                compare_values(actual.as_deref(), op, value)
            }
        }
    }
}

/// Gets a state field value from the app.
///
/// Absent values (no selection, nothing chosen) read as "none".
pub fn get_state_field(app: &App, field: &str) -> Option<String> {
    let search = &app.search;
    match field {
        "query" => Some(app.input.text.clone()),
        "focus" => Some(app.focus.as_str().to_string()),
        "selected" => Some(
            search
                .selected_index()
                .map_or_else(|| "none".to_string(), |i| i.to_string()),
        ),
        "suggestion_count" => Some(search.suggestions().len().to_string()),
        "list_visible" => Some(search.is_open().to_string()),
        "fetch_count" => Some(search.requests_issued().to_string()),
        "last_fetch" => Some(search.last_query().unwrap_or_default().to_string()),
        "chosen" => Some(
            app.chosen
                .as_ref()
                .map_or_else(|| "none".to_string(), |p| p.id.clone()),
        ),
        "running" => Some(app.running.to_string()),
        _ => None,
    }
}

/// Compares values using the given operator.
fn compare_values(actual: Option<&str>, op: &str, expected: &str) -> bool {
    let actual = match actual {
        Some(v) => v,
        None => return false,
    };

    if let (Ok(a), Ok(e)) = (actual.parse::<i64>(), expected.parse::<i64>()) {
        return match op {
            ">=" => a >= e,
            "<=" => a <= e,
            ">" => a > e,
            "<" => a < e,
            "=" | "==" => a == e,
            _ => false,
        };
    }

    match op {
        "=" | "==" => actual == expected,
        _ => false,
    }
}

/// A parsed event that can be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// Type text (expands to one key event per character).
    Type(String),
    /// Advance the virtual clock.
    Wait(Duration),
    /// Pointer enters a suggestion row.
    Hover(usize),
    /// Pointer leaves a suggestion row.
    Leave(usize),
    /// Click on a suggestion row.
    Click(usize),
    /// Focus the search input.
    Focus,
    /// Move focus away from the search input.
    Blur,
    /// Resize the terminal.
    Resize(u16, u16),
    /// Take a named snapshot.
    Snapshot(String),
    /// Assert something about the screen or state.
    Assert(Assertion),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => {
                let mut parts = Vec::new();
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    parts.push("ctrl");
                }
                if key.modifiers.contains(KeyModifiers::ALT) {
                    parts.push("alt");
                }
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    parts.push("shift");
                }
                let key_name = key_code_to_string(&key.code);
                parts.push(&key_name);
                write!(f, "key:{}", parts.join("+"))
            }
            Self::Type(text) => write!(f, "type:{}", text),
            Self::Wait(d) => write!(f, "wait:{}ms", d.as_millis()),
            Self::Hover(i) => write!(f, "hover:{}", i),
            Self::Leave(i) => write!(f, "leave:{}", i),
            Self::Click(i) => write!(f, "click:{}", i),
            Self::Focus => write!(f, "focus"),
            Self::Blur => write!(f, "blur"),
            Self::Resize(w, h) => write!(f, "resize:{}x{}", w, h),
            Self::Snapshot(name) => write!(f, "snapshot:{}", name),
            Self::Assert(a) => match a {
                Assertion::Contains(t) => write!(f, "assert:contains:{}", t),
                Assertion::ContainsExact(t) => write!(f, "assert:contains-exact:{}", t),
                Assertion::NotContains(t) => write!(f, "assert:not-contains:{}", t),
                Assertion::Matches(p) => write!(f, "assert:matches:{}", p),
                Assertion::StateEquals { field, value } => {
                    write!(f, "assert:state:{}={}", field, value)
                }
                Assertion::StateCompare { field, op, value } => {
                    write!(f, "assert:state:{}{}{}", field, op, value)
                }
            },
        }
    }
}

fn key_code_to_string(code: &KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        _ => "unknown".to_string(),
    }
}

/// Parser for the event DSL.
#[derive(Debug, Default)]
pub struct EventParser;

impl EventParser {
    /// Creates a new event parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses all events from an input string.
    /// Supports comma-separated and newline-separated events.
    pub fn parse_all(&self, input: &str) -> Result<Vec<Event>> {
        let mut events = Vec::new();

        for line in input.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            for part in line.split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }

                events.push(self.parse_one(part)?);
            }
        }

        Ok(events)
    }

    /// Parses a single event string.
    pub fn parse_one(&self, input: &str) -> Result<Event> {
        let input = input.trim();

        match input.to_lowercase().as_str() {
            "focus" => return Ok(Event::Focus),
            "blur" => return Ok(Event::Blur),
            _ => {}
        }

        let (event_type, value) = match input.split_once(':') {
            Some((t, v)) => (t.trim().to_lowercase(), v),
            None => {
                return Err(GeoSearchError::config(format!(
                    "Invalid event syntax: '{}'. Expected format: type:value",
                    input
                )));
            }
        };

        match event_type.as_str() {
            "key" => self.parse_key(value.trim()),
            // Text is taken verbatim so "type: York" types a leading space.
            "type" => Ok(Event::Type(value.to_string())),
            "wait" => self.parse_wait(value),
            "hover" => self.parse_row(value).map(Event::Hover),
            "leave" => self.parse_row(value).map(Event::Leave),
            "click" => self.parse_row(value).map(Event::Click),
            "resize" => self.parse_resize(value.trim()),
            "snapshot" => Ok(Event::Snapshot(value.trim().to_string())),
            "assert" => self.parse_assert(value.trim()),
            _ => Err(GeoSearchError::config(format!(
                "Unknown event type: '{}'. Valid types: key, type, wait, hover, leave, click, focus, blur, resize, snapshot, assert",
                event_type
            ))),
        }
    }

    /// Parses a key event like "enter", "ctrl+c".
    fn parse_key(&self, value: &str) -> Result<Event> {
        let parts: Vec<&str> = value.split('+').collect();
        let mut modifiers = KeyModifiers::empty();
        let mut key_str = "";

        for (i, part) in parts.iter().enumerate() {
            if i == parts.len() - 1 {
                key_str = part;
            } else {
                match part.to_lowercase().as_str() {
                    "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                    "alt" => modifiers |= KeyModifiers::ALT,
                    "shift" => modifiers |= KeyModifiers::SHIFT,
                    _ => {
                        return Err(GeoSearchError::config(format!(
                            "Unknown modifier: '{}'. Valid modifiers: ctrl, alt, shift",
                            part
                        )));
                    }
                }
            }
        }

        let code = self.parse_key_code(key_str)?;

        Ok(Event::Key(KeyEvent::new(code, modifiers)))
    }

    /// Parses a key code string into a KeyCode.
    fn parse_key_code(&self, s: &str) -> Result<KeyCode> {
        let code = match s.to_lowercase().as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bs" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "space" => KeyCode::Char(' '),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => {
                        return Err(GeoSearchError::config(format!(
                            "Unknown key: '{}'. Use single characters or named keys like enter, esc, up, down",
                            s
                        )));
                    }
                }
            }
        };

        Ok(code)
    }

    /// Parses a wait duration like "100ms", "2s", or just "100" (defaults to ms).
    fn parse_wait(&self, value: &str) -> Result<Event> {
        let value = value.trim().to_lowercase();
        let invalid = || GeoSearchError::config(format!("Invalid duration: '{}'", value));

        let duration = if let Some(ms) = value.strip_suffix("ms") {
            Duration::from_millis(ms.parse().map_err(|_| invalid())?)
        } else if let Some(secs) = value.strip_suffix('s') {
            Duration::from_secs(secs.parse().map_err(|_| invalid())?)
        } else {
            Duration::from_millis(value.parse().map_err(|_| invalid())?)
        };

        Ok(Event::Wait(duration))
    }

    /// Parses a zero-based suggestion row index.
    fn parse_row(&self, value: &str) -> Result<usize> {
        value
            .trim()
            .parse()
            .map_err(|_| GeoSearchError::config(format!("Invalid row index: '{}'", value.trim())))
    }

    /// Parses a resize event like "120x40".
    fn parse_resize(&self, value: &str) -> Result<Event> {
        let (width, height) = value.split_once('x').ok_or_else(|| {
            GeoSearchError::config(format!(
                "Invalid resize format: '{}'. Expected WIDTHxHEIGHT",
                value
            ))
        })?;

        let width: u16 = width
            .parse()
            .map_err(|_| GeoSearchError::config(format!("Invalid width: '{}'", width)))?;
        let height: u16 = height
            .parse()
            .map_err(|_| GeoSearchError::config(format!("Invalid height: '{}'", height)))?;

        Ok(Event::Resize(width, height))
    }

    /// Parses an assertion like "contains:Paris" or "state:selected=2".
    fn parse_assert(&self, value: &str) -> Result<Event> {
        let (assert_type, rest) = match value.split_once(':') {
            Some((t, r)) => (t.trim().to_lowercase(), r.trim()),
            None => {
                return Err(GeoSearchError::config(format!(
                    "Invalid assertion syntax: '{}'. Expected assert:type:value",
                    value
                )));
            }
        };

        let assertion = match assert_type.as_str() {
            "contains" => Assertion::Contains(rest.to_string()),
            "contains-exact" => Assertion::ContainsExact(rest.to_string()),
            "not-contains" => Assertion::NotContains(rest.to_string()),
            "matches" => Assertion::Matches(rest.to_string()),
            "state" => self.parse_state_assertion(rest)?,
            _ => {
                return Err(GeoSearchError::config(format!(
                    "Unknown assertion type: '{}'. Valid types: contains, contains-exact, not-contains, matches, state",
                    assert_type
                )));
            }
        };

        Ok(Event::Assert(assertion))
    }

    /// Parses a state assertion like "focus=search" or "fetch_count>=2".
    fn parse_state_assertion(&self, value: &str) -> Result<Assertion> {
        for op in &[">=", "<=", ">", "<", "="] {
            if let Some(pos) = value.find(op) {
                let field = value[..pos].trim().to_string();
                let val = value[pos + op.len()..].trim().to_string();

                if *op == "=" {
                    return Ok(Assertion::StateEquals { field, value: val });
                }
                return Ok(Assertion::StateCompare {
                    field,
                    op: op.to_string(),
                    value: val,
                });
            }
        }

        Err(GeoSearchError::config(format!(
            "Invalid state assertion: '{}'. Expected field=value or field>=value",
            value
        )))
    }
}
