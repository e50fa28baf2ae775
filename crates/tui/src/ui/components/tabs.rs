use engine::{Counts, Filters, StatusFilter};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

/// Renders the status filter as a tab bar, each tab with its counter,
/// followed by the priority filter and sort order.
pub fn render_filters(
    frame: &mut Frame<'_>,
    area: Rect,
    filters: &Filters,
    counts: Counts,
    theme: &Theme,
) {
    let mut spans = vec![Span::raw(" ")];

    for (i, status) in StatusFilter::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }

        let label = format!("{} ({})", status.label(), counts.for_status(status));
        if status == filters.status {
            spans.push(Span::styled("[", Style::default().fg(theme.accent)));
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("]", Style::default().fg(theme.accent)));
        } else {
            spans.push(Span::styled(label, Style::default().fg(theme.text_muted)));
        }
    }

    spans.push(Span::styled("   │   ", Style::default().fg(theme.border)));
    spans.push(Span::styled("Priority", Style::default().fg(theme.text_muted)));
    spans.push(Span::raw(format!(": {}   ", filters.priority.label())));
    spans.push(Span::styled("Sort", Style::default().fg(theme.text_muted)));
    spans.push(Span::raw(format!(": {}", filters.sort.label())));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
