//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components. The same layout is used
//! to hit-test pointer events so hovering and clicking land on the rows that
//! were drawn.

use super::app::{App, Focus};
use super::widgets::{header, place_panel, search_bar, suggestions, toast};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Screen regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub header: Rect,
    pub search: Rect,
    pub body: Rect,
    pub footer: Rect,
}

/// Splits the screen into header, search bar, body and footer.
pub fn layout(area: Rect) -> AppLayout {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Search bar
            Constraint::Min(0),    // Place panel
            Constraint::Length(1), // Footer
        ])
        .split(area);

    AppLayout {
        header: main_layout[0],
        search: main_layout[1],
        body: main_layout[2],
        footer: main_layout[3],
    }
}

/// Returns true if the cell at `column`, `row` lies inside `area`.
pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

/// Area covered by the suggestion popup, if it is showing.
pub fn suggestion_area(app: &App, area: Rect) -> Option<Rect> {
    if !app.search.is_open() {
        return None;
    }
    let layout = layout(area);
    let popup = suggestions::SuggestionList::popup_area(
        layout.search,
        layout.body,
        app.search.suggestions().len(),
    );
    (popup.height > 2).then_some(popup)
}

/// Number of suggestion rows the popup can show on a screen of size `area`.
pub fn suggestion_window(area: Rect) -> usize {
    let layout = layout(area);
    let popup = suggestions::SuggestionList::popup_area(
        layout.search,
        layout.body,
        suggestions::MAX_VISIBLE_ROWS,
    );
    suggestions::SuggestionList::row_capacity(popup)
}

/// Maps a screen cell to the suggestion row drawn there.
pub fn suggestion_row_at(app: &App, column: u16, row: u16) -> Option<usize> {
    let popup = suggestion_area(app, app.screen)?;
    let inner = Rect::new(
        popup.x + 1,
        popup.y + 1,
        popup.width.saturating_sub(2),
        popup.height.saturating_sub(2),
    );
    if !contains(inner, column, row) {
        return None;
    }

    let count = app.search.suggestions().len();
    let index = app.search.scroll_offset() + (row - inner.y) as usize;
    (index < count).then_some(index)
}

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let regions = layout(area);

    render_header(frame, regions.header, app);
    render_place_panel(frame, regions.body, app);
    render_search_bar(frame, regions.search, app);
    render_footer(frame, regions.footer, app);

    if let Some(popup) = suggestion_area(app, area) {
        frame.render_widget(suggestions::SuggestionList::new(&app.search), popup);
    }

    if let Some(message) = app.toast_message() {
        frame.render_widget(toast::Toast::new(message), toast::Toast::area(area));
    }
}

/// Renders the header bar.
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let spinner = app.search.is_loading().then_some(&app.spinner);
    let widget = header::Header::new(&app.provider_info, spinner);
    frame.render_widget(widget, area);
}

/// Renders the search bar.
fn render_search_bar(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Search;
    let widget = search_bar::SearchBar::new(&app.input.text, app.input.cursor, focused);
    frame.render_widget(widget, area);

    if focused {
        let scroll = search_bar::calculate_scroll_offset(
            app.input.cursor,
            search_bar::SearchBar::available_width(area),
        );
        let cursor_x = area.x + search_bar::PROMPT_WIDTH + (app.input.cursor - scroll) as u16;
        let cursor_y = area.y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Renders the place panel.
fn render_place_panel(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Place;
    let widget = place_panel::PlacePanel::new(app.chosen.as_ref(), &app.recent, focused);
    frame.render_widget(widget, area);
}

/// Renders the key hints.
fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let hints: &[(&str, &str)] = match app.focus {
        Focus::Search => &[
            ("↑↓", "select"),
            ("Enter", "choose"),
            ("Esc", "clear"),
            ("Tab", "place"),
            ("^C", "quit"),
        ],
        Focus::Place => &[("/", "search"), ("Tab", "search"), ("^C", "quit")],
    };

    let key_style = Style::default().fg(Color::Cyan);
    let text_style = Style::default().fg(Color::DarkGray);
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(format!(" {key}"), key_style),
                Span::styled(format!(" {action} "), text_style),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
