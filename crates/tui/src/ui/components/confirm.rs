use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::ui::{centered_box, theme::Theme};

/// Delete confirmation popup over the list.
pub fn render(frame: &mut Frame<'_>, area: Rect, title: &str) {
    let theme = Theme::default();
    let width = (title.chars().count() as u16 + 12).clamp(30, area.width);
    let popup = centered_box(width, 5, area);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .title(" delete ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.error));

    let lines = vec![
        Line::from(Span::styled(
            format!("\"{title}\""),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.accent)),
            Span::raw(" delete   "),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(" keep"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center),
        popup,
    );
}
