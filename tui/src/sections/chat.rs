//! Chat panel: model and prompt inputs, streamed response below

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use harness_core::ChatSession;

use super::{button, checkbox_row, error_row, panel, text_row};
use crate::focus::{Field, Section};
use crate::theme::DIM_GRAY;
use crate::widgets::{TextBlock, TextBlockState};

/// Rows taken by the form and the status line
const FORM_HEIGHT: u16 = 5;

/// Draw the chat panel
pub fn render(
    frame: &mut Frame,
    area: Rect,
    chat: &ChatSession,
    focus: Option<Field>,
    scroll: &mut TextBlockState,
) {
    let block = panel(Section::Chat, focus.is_some(), Some(&chat.badge()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [form_area, response_area] =
        Layout::vertical([Constraint::Length(FORM_HEIGHT), Constraint::Min(0)]).areas(inner);

    let editable = chat.is_editable();
    let mut model = text_row("Model", chat.model_input(), focus == Some(Field::Model), editable);
    let suggestions = chat.model_suggestions().len();
    if suggestions > 0 {
        model.push_span(Span::styled(
            format!("  (←/→ {suggestions} models)"),
            Style::default().fg(DIM_GRAY),
        ));
    }

    let summary = match chat.error() {
        Some(error) => error_row(error),
        None => Line::from(Span::styled(
            "Enter to send, Ctrl-R to refresh models",
            Style::default().fg(DIM_GRAY),
        )),
    };

    let lines = vec![
        model,
        text_row("Prompt", chat.prompt(), focus == Some(Field::Prompt), editable),
        checkbox_row(
            "Authenticated",
            chat.authenticated(),
            focus == Some(Field::ChatAuthenticated),
        ),
        Line::from(vec![
            button(
                "Refresh models",
                focus == Some(Field::RefreshModels),
                chat.can_refresh(),
            ),
            Span::raw(" "),
            button("Send", focus == Some(Field::SendChat), chat.can_send()),
        ]),
        summary,
    ];
    frame.render_widget(Paragraph::new(lines), form_area);

    frame.render_stateful_widget(TextBlock::new(chat.response()), response_area, scroll);
}
