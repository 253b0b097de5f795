//! Section renderers
//!
//! One module per panel. Each renders straight from the harness views;
//! none of them hold state beyond scroll positions owned by the app.

pub mod auth;
pub mod chat;
pub mod status;
pub mod tester;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};

use harness_core::Badge;

use crate::focus::Section;
use crate::theme::{badge_span, border_style, field_style, DIM_GRAY, ERROR_RED, LABEL};

/// Bordered panel titled with the section name and an optional badge
pub(crate) fn panel(section: Section, focused: bool, badge: Option<&Badge>) -> Block<'static> {
    let mut title = vec![Span::styled(
        format!(" {} ", section.title()),
        border_style(focused).add_modifier(Modifier::BOLD),
    )];
    if let Some(badge) = badge {
        title.push(badge_span(badge));
        title.push(Span::raw(" "));
    }
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(Line::from(title))
}

/// `Label: value` row; a trailing cursor marks a focused text field
pub(crate) fn text_row(label: &str, value: &str, focused: bool, editable: bool) -> Line<'static> {
    let mut value = value.replace('\n', "⏎");
    if focused && editable {
        value.push('_');
    }
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(LABEL)),
        Span::styled(value, field_style(focused)),
    ])
}

/// `[x] Label` checkbox row
pub(crate) fn checkbox_row(label: &str, checked: bool, focused: bool) -> Line<'static> {
    let mark = if checked { "[x]" } else { "[ ]" };
    Line::from(Span::styled(format!("{mark} {label}"), field_style(focused)))
}

/// `[ Label ]` button row, dimmed when disabled
pub(crate) fn button(label: &str, focused: bool, enabled: bool) -> Span<'static> {
    let style = if enabled {
        field_style(focused)
    } else {
        field_style(focused).fg(DIM_GRAY)
    };
    Span::styled(format!("[ {label} ]"), style)
}

/// Error banner row
pub(crate) fn error_row(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD),
    ))
}
