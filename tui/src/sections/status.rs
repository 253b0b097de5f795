//! Status panel: overall, client and server badges plus the setup action

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use harness_core::StatusView;

use super::{button, panel};
use crate::focus::{Field, Section};
use crate::theme::{badge_span, LABEL};

/// Draw the status panel
pub fn render(frame: &mut Frame, area: Rect, view: &StatusView, focus: Option<Field>) {
    let block = panel(Section::Status, focus.is_some(), Some(&view.overall));

    let lines = vec![
        Line::from(vec![
            Span::styled("Client: ", Style::default().fg(LABEL)),
            badge_span(&view.client),
        ]),
        Line::from(vec![
            Span::styled("Server: ", Style::default().fg(LABEL)),
            badge_span(&view.server),
        ]),
        Line::from(button("Setup", focus == Some(Field::SetupButton), true)),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
