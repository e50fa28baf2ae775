use engine::Notice;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

/// One-line error banner for the current notice. Renders nothing when there
/// is none.
pub fn render(frame: &mut Frame<'_>, area: Rect, notice: Option<&Notice>) {
    let Some(notice) = notice else {
        return;
    };
    let theme = Theme::default();

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", notice.message()),
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("({})", notice.error),
            Style::default().fg(theme.text_muted),
        ),
        Span::styled("  x to dismiss", Style::default().fg(theme.dim)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
