use chrono::{DateTime, Local, Utc};
use engine::{
    DueStatus, Todo,
    view::{due_status, empty_message},
};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{app::AppState, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let visible = state.visible();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    if visible.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(empty_message(state.filters.status)))
                .style(Style::default().fg(theme.text_muted))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let now = Local::now();
    let items = visible
        .items
        .iter()
        .map(|todo| {
            let editing = state.edits.is_editing(todo.id);
            ListItem::new(todo_line(todo, editing, &now, &theme))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn todo_line(todo: &Todo, editing: bool, now: &DateTime<Local>, theme: &Theme) -> Line<'static> {
    let (check, title_style) = if todo.completed {
        (
            "[x]",
            Style::default()
                .fg(theme.dim)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        ("[ ]", Style::default().fg(theme.text))
    };

    let mut spans = vec![
        Span::styled(format!("{check} "), Style::default().fg(theme.text_muted)),
        Span::styled(todo.title.clone(), title_style),
        Span::raw("  "),
        Span::styled(
            todo.priority.as_str().to_uppercase(),
            Style::default().fg(theme.priority(todo.priority)),
        ),
    ];

    if let Some(due) = &todo.due_date {
        let status = due_status(due, now);
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            due_label(due, status, now),
            Style::default().fg(theme.due(status)),
        ));
    }
    if let Some(description) = &todo.description {
        spans.push(Span::styled(
            format!("  {description}"),
            Style::default().fg(theme.dim),
        ));
    }
    if editing {
        spans.push(Span::styled("  (editing)", Style::default().fg(theme.accent)));
    }

    Line::from(spans)
}

fn due_label(due: &DateTime<Utc>, status: DueStatus, now: &DateTime<Local>) -> String {
    match status {
        DueStatus::Today => "Due today".to_string(),
        DueStatus::Tomorrow => "Due tomorrow".to_string(),
        DueStatus::Overdue => "Overdue".to_string(),
        DueStatus::Upcoming => {
            let local = due.with_timezone(&now.timezone());
            format!("Due {}", local.format("%b %d"))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn upcoming_due_dates_show_the_day() {
        let now = Local.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let due = Local
            .with_ymd_and_hms(2025, 3, 20, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(due_label(&due, DueStatus::Upcoming, &now), "Due Mar 20");
        assert_eq!(due_label(&due, DueStatus::Overdue, &now), "Overdue");
    }
}
