//! Auth panel: identity fields and the login/logout button

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use harness_core::AuthView;

use super::{button, panel, text_row};
use crate::focus::{Field, Section};

/// Draw the auth panel
pub fn render(frame: &mut Frame, area: Rect, view: &AuthView, focus: Option<Field>) {
    let block = panel(Section::Auth, focus.is_some(), view.badge.as_ref());

    let lines = vec![
        text_row("Username", &view.username, false, false),
        text_row("Email", &view.email, false, false),
        text_row("Name", &view.name, false, false),
        Line::from(button(
            view.action_label,
            focus == Some(Field::AuthButton),
            view.action_enabled,
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
