use ratatui::{style::Style, text::Span};

use crate::{app::Mode, ui::theme::Theme};

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

/// Creates a separator span for dividing hint groups.
pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

/// Hints for the given mode.
pub fn for_mode(mode: Mode) -> Vec<KeyHint> {
    match mode {
        Mode::Browse => vec![
            KeyHint::new("j/k", "select"),
            KeyHint::new("space", "toggle"),
            KeyHint::new("a", "add"),
            KeyHint::new("e", "edit"),
            KeyHint::new("d", "delete"),
            KeyHint::new("s", "status"),
            KeyHint::new("p", "priority"),
            KeyHint::new("o", "sort"),
            KeyHint::new("r", "reload"),
        ],
        Mode::Adding(_) | Mode::Editing { .. } => vec![
            KeyHint::new("Tab", "next"),
            KeyHint::new("←→", "priority"),
            KeyHint::new("Enter", "save"),
            KeyHint::new("Esc", "cancel"),
        ],
        Mode::ConfirmDelete(_) => vec![KeyHint::new("y", "delete"), KeyHint::new("n", "keep")],
    }
}

/// Hints shown regardless of mode.
pub fn global(mode: Mode) -> Vec<KeyHint> {
    if mode.is_typing() {
        vec![KeyHint::new("Ctrl+C", "quit")]
    } else {
        vec![KeyHint::new("x", "dismiss"), KeyHint::new("q", "quit")]
    }
}
