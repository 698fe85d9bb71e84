//! Search bar widget for the TUI.
//!
//! Renders the query text with a prompt, horizontal scrolling that keeps the
//! cursor visible, and a placeholder when empty.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Placeholder shown when the query is empty.
pub const PLACEHOLDER: &str = "Search for a location";

/// Width taken by the left border and the "> " prompt.
pub const PROMPT_WIDTH: u16 = 3;

/// Calculates the scroll offset needed to keep the cursor visible.
///
/// Returns the number of characters to skip from the start of the text.
pub fn calculate_scroll_offset(cursor: usize, available_width: usize) -> usize {
    cursor.saturating_sub(available_width)
}

/// Search bar widget.
pub struct SearchBar<'a> {
    text: &'a str,
    /// Cursor position in characters.
    cursor: usize,
    focused: bool,
}

impl<'a> SearchBar<'a> {
    /// Creates a new search bar widget.
    pub fn new(text: &'a str, cursor: usize, focused: bool) -> Self {
        Self {
            text,
            cursor,
            focused,
        }
    }

    /// Columns available for text inside `area`.
    ///
    /// Border left (1) + prompt "> " (2) + border right (1) + cursor space (1).
    pub fn available_width(area: Rect) -> usize {
        area.width.saturating_sub(5) as usize
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Location ");

        let prompt_style = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);

        let body = if self.text.is_empty() {
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))
        } else {
            let offset = calculate_scroll_offset(self.cursor, Self::available_width(area));
            let visible: String = self.text.chars().skip(offset).collect();
            Span::raw(visible)
        };

        let line = Line::from(vec![Span::styled("> ", prompt_style), body]);
        Paragraph::new(line).block(block).render(area, buf);
    }
}
