use engine::Priority;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, FormField, Mode},
    ui::theme::Theme,
};

/// Rows the form needs, borders included.
pub fn height(mode: Mode) -> u16 {
    match mode {
        Mode::Adding(_) => 7,
        Mode::Editing { .. } => 6,
        _ => 0,
    }
}

struct Row<'a> {
    field: FormField,
    value: Value<'a>,
}

enum Value<'a> {
    Text(&'a str),
    Choice(Priority),
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let (title, focus, rows) = match state.mode {
        Mode::Adding(focus) => {
            let draft = &state.draft;
            let rows = vec![
                Row {
                    field: FormField::Title,
                    value: Value::Text(&draft.title),
                },
                Row {
                    field: FormField::Description,
                    value: Value::Text(&draft.description),
                },
                Row {
                    field: FormField::Priority,
                    value: Value::Choice(draft.priority),
                },
                Row {
                    field: FormField::DueDate,
                    value: Value::Text(&state.due_input),
                },
            ];
            (" new todo ".to_string(), focus, rows)
        }
        Mode::Editing { id, field } => {
            let Some(buffer) = state.edits.buffer(id) else {
                return;
            };
            let rows = vec![
                Row {
                    field: FormField::Title,
                    value: Value::Text(&buffer.title),
                },
                Row {
                    field: FormField::Description,
                    value: Value::Text(&buffer.description),
                },
                Row {
                    field: FormField::Priority,
                    value: Value::Choice(buffer.priority),
                },
            ];
            (format!(" edit #{id} "), field, rows)
        }
        _ => return,
    };

    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(1); rows.len()];
    constraints.push(Constraint::Length(1)); // validation
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(1)
        .split(inner);

    for (row, area) in rows.iter().zip(layout.iter()) {
        render_row(frame, *area, row, row.field == focus, &theme);
    }

    let hint = match &state.validation {
        Some(message) => Span::styled(message.as_str(), Style::default().fg(theme.error)),
        None if focus == FormField::DueDate => Span::styled(
            "YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS, blank for none",
            Style::default().fg(theme.dim),
        ),
        None => Span::raw(""),
    };
    if let Some(area) = layout.last() {
        frame.render_widget(Paragraph::new(hint), *area);
    }
}

fn render_row(frame: &mut Frame<'_>, area: Rect, row: &Row<'_>, focused: bool, theme: &Theme) {
    let label_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let label = Span::styled(format!("{:<12}", row.field.label()), label_style);

    let value = match row.value {
        Value::Text(text) => {
            let cursor = if focused { "│" } else { "" };
            Span::styled(format!("{text}{cursor}"), Style::default().fg(theme.text))
        }
        Value::Choice(priority) => {
            let text = if focused {
                format!("‹ {priority} ›")
            } else {
                priority.to_string()
            };
            Span::styled(text, Style::default().fg(theme.priority(priority)))
        }
    };

    frame.render_widget(Paragraph::new(Line::from(vec![label, value])), area);
}
