pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Mode};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

/// Calculates a rect of the given size centered in `area`.
pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    let banner_height = u16::from(state.notice.is_some());

    // Main layout: info bar, filter bar, banner, form, list, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(banner_height),
            Constraint::Length(screens::form::height(state.mode)),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let visible = state.visible();
    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_filters(frame, layout[1], &state.filters, visible.counts, &theme);
    components::banner::render(frame, layout[2], state.notice.as_ref());
    screens::form::render(frame, layout[3], state);
    screens::list::render(frame, layout[4], state);
    render_bottom_bar(frame, layout[5], state.mode, &theme);

    if let Mode::ConfirmDelete(id) = state.mode {
        if let Some(todo) = state.todos.iter().find(|todo| todo.id == id) {
            components::confirm::render(frame, layout[4], &todo.title);
        }
    }
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let (status, status_style) = match state.connected {
        Some(true) => ("OK", Style::default().fg(theme.positive)),
        Some(false) => ("ERR", Style::default().fg(theme.error)),
        None => ("…", Style::default().fg(theme.text_muted)),
    };

    let line = Line::from(vec![
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Refresh", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, mode: Mode, theme: &Theme) {
    let mut parts = components::hints::hints_to_spans(&components::hints::for_mode(mode), theme);
    parts.push(components::hints::hint_separator(theme));
    parts.extend(components::hints::hints_to_spans(
        &components::hints::global(mode),
        theme,
    ));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
