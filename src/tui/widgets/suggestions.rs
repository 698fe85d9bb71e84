//! Suggestion list popup.
//!
//! Drawn directly below the search bar while the search input is open. Each
//! suggestion takes one row; the highlighted row follows the selection cursor.

use crate::search::SearchInput;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Upper bound on rows shown at once.
pub const MAX_VISIBLE_ROWS: usize = 8;

/// Suggestion list popup widget.
pub struct SuggestionList<'a> {
    search: &'a SearchInput,
}

impl<'a> SuggestionList<'a> {
    /// Creates a new suggestion list widget.
    pub fn new(search: &'a SearchInput) -> Self {
        Self { search }
    }

    /// Calculates the popup area below the search bar.
    ///
    /// `bounds` is the region the popup may cover.
    pub fn popup_area(search_area: Rect, bounds: Rect, count: usize) -> Rect {
        let y = search_area.bottom();
        let max_height = bounds.bottom().saturating_sub(y);
        let rows = count.min(MAX_VISIBLE_ROWS) as u16;
        let height = (rows + 2).min(max_height); // +2 for borders
        let width = search_area.width.saturating_sub(2);
        Rect::new(search_area.x + 1, y, width, height)
    }

    /// Number of suggestion rows that fit inside `area`.
    pub fn row_capacity(area: Rect) -> usize {
        area.height.saturating_sub(2) as usize
    }
}

impl Widget for SuggestionList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let suggestions = self.search.suggestions();
        let title = format!(" {} places ", suggestions.len());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(title);

        let inner = block.inner(area);
        block.render(area, buf);

        let selected = self.search.selected_index();
        let offset = self.search.scroll_offset();

        for (row, (idx, suggestion)) in suggestions
            .iter()
            .enumerate()
            .skip(offset)
            .take(inner.height as usize)
            .enumerate()
        {
            let y = inner.y + row as u16;
            let is_selected = selected == Some(idx);
            let bg_color = if is_selected {
                Color::DarkGray
            } else {
                Color::Reset
            };

            for x in inner.x..inner.x + inner.width {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_bg(bg_color);
                }
            }

            let marker = if is_selected { "▸ " } else { "  " };
            let text_style = if is_selected {
                Style::default()
                    .fg(Color::White)
                    .bg(bg_color)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let context_style = Style::default().fg(Color::DarkGray).bg(bg_color);

            let mut spans = vec![
                Span::styled(marker, text_style),
                Span::styled(suggestion.text.as_str(), text_style),
            ];
            if let Some(context) = &suggestion.context {
                spans.push(Span::styled(format!(", {context}"), context_style));
            }

            Paragraph::new(Line::from(spans)).render(Rect::new(inner.x, y, inner.width, 1), buf);
        }
    }
}
