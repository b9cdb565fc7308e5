use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use super::roles::Theme;
use rview_types::FlashLevel;

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(
            format!(" {t} "),
            theme.text_secondary_style().add_modifier(Modifier::BOLD),
        ));
    }
    block
}

/// Style for panel-like containers.
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let roles = theme.roles();
    Style::default().bg(roles.surface).fg(roles.text)
}

/// Style for table headers.
pub fn table_header_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.text_secondary_style().add_modifier(Modifier::BOLD)
}

/// Style of a notification in the flash bar.
pub fn flash_style<T: Theme + ?Sized>(theme: &T, level: FlashLevel) -> Style {
    match level {
        FlashLevel::Info => theme.status_info(),
        FlashLevel::Error => theme.status_error().add_modifier(Modifier::BOLD),
    }
}

/// Builds `key label` hint spans, accent for keys and muted text for labels.
pub fn build_hint_spans<T: Theme + ?Sized>(theme: &T, hints: &[(String, String)]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(format!("<{key}>"), theme.accent_emphasis_style()));
        spans.push(Span::styled(format!(" {label}  "), theme.text_muted_style()));
    }
    spans
}
