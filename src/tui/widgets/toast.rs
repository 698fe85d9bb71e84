//! Toast notification widget for the TUI.
//!
//! Reports failed lookups without disturbing the suggestion list.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Toast notification widget.
pub struct Toast<'a> {
    message: &'a str,
}

impl<'a> Toast<'a> {
    /// Creates a new toast widget.
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }

    /// Calculates the area for the toast (bottom-right corner).
    pub fn area(screen: Rect) -> Rect {
        let width = 48.min(screen.width.saturating_sub(4));
        let height = 3;
        let x = screen.width.saturating_sub(width + 2);
        let y = screen.height.saturating_sub(height + 1);
        Rect::new(x, y, width, height)
    }

    /// Shortens `message` to `max_chars`, marking the cut with an ellipsis.
    fn truncate(message: &str, max_chars: usize) -> String {
        if message.chars().count() <= max_chars {
            return message.to_string();
        }
        let mut cut: String = message.chars().take(max_chars.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

impl Widget for Toast<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Lookup failed ")
            .style(Style::default().bg(Color::Black));

        let inner = block.inner(area);
        block.render(area, buf);

        let line = Line::from(vec![Span::styled(
            Self::truncate(self.message, inner.width as usize),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )]);

        Paragraph::new(line).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_area() {
        let screen = Rect::new(0, 0, 80, 24);
        let area = Toast::area(screen);
        assert_eq!(area, Rect::new(30, 20, 48, 3));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(Toast::truncate("short", 10), "short");
        assert_eq!(Toast::truncate("São Paulo timed out", 5), "São …");
    }
}
