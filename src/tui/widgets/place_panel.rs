//! Place panel widget.
//!
//! Shows the place picked from the suggestion list along with the most
//! recent picks.

use crate::geocoding::Suggestion;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Place panel widget.
pub struct PlacePanel<'a> {
    chosen: Option<&'a Suggestion>,
    recent: &'a [Suggestion],
    focused: bool,
}

impl<'a> PlacePanel<'a> {
    /// Creates a new place panel widget.
    pub fn new(chosen: Option<&'a Suggestion>, recent: &'a [Suggestion], focused: bool) -> Self {
        Self {
            chosen,
            recent,
            focused,
        }
    }

    fn chosen_lines(&self) -> Vec<Line<'a>> {
        let label = Style::default().fg(Color::DarkGray);
        match self.chosen {
            None => vec![Line::from(Span::styled(
                "No place selected. Type a name and pick a suggestion.",
                label,
            ))],
            Some(place) => {
                let mut lines = vec![Line::from(Span::styled(
                    place.display_name().to_string(),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ))];
                if let Some(center) = &place.center {
                    lines.push(Line::from(vec![
                        Span::styled("Coordinates: ", label),
                        Span::raw(center.to_string()),
                    ]));
                }
                lines.push(Line::from(vec![
                    Span::styled("Id: ", label),
                    Span::raw(place.id.clone()),
                ]));
                lines
            }
        }
    }
}

impl Widget for PlacePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Place ");

        let inner = block.inner(area);
        block.render(area, buf);

        let [chosen_area, recent_area] =
            Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(inner);

        Paragraph::new(self.chosen_lines())
            .wrap(Wrap { trim: true })
            .render(chosen_area, buf);

        if self.recent.is_empty() {
            return;
        }

        let mut lines = vec![Line::from(Span::styled(
            "Recent",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))];
        lines.extend(
            self.recent
                .iter()
                .map(|place| Line::from(format!("  {}", place.display_name()))),
        );
        Paragraph::new(lines).render(recent_area, buf);
    }
}
