//! API Test panel: request form on top, raw response below

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use harness_core::ApiTester;

use super::{button, checkbox_row, error_row, panel, text_row};
use crate::focus::{Field, Section};
use crate::theme::{field_style, DIM_GRAY, LABEL};
use crate::widgets::{TextBlock, TextBlockState};

/// Rows taken by the form and the status line
const FORM_HEIGHT: u16 = 6;

/// Draw the tester panel
pub fn render(
    frame: &mut Frame,
    area: Rect,
    tester: &ApiTester,
    focus: Option<Field>,
    scroll: &mut TextBlockState,
) {
    let block = panel(Section::Tester, focus.is_some(), Some(&tester.status().badge()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [form_area, body_area] =
        Layout::vertical([Constraint::Length(FORM_HEIGHT), Constraint::Min(0)]).areas(inner);

    let draft = tester.draft();
    let method_focused = focus == Some(Field::Method);
    let method = if method_focused {
        format!("< {} >", draft.method)
    } else {
        draft.method.clone()
    };

    let summary = match (tester.error(), tester.response()) {
        (Some(error), _) => error_row(&error),
        (None, Some(response)) => Line::from(Span::styled(
            format!("Status: {}", response.status),
            Style::default().fg(LABEL),
        )),
        (None, None) => Line::from(Span::styled(
            "Enter to send, Ctrl-L to clear",
            Style::default().fg(DIM_GRAY),
        )),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Method: ", Style::default().fg(LABEL)),
            Span::styled(method, field_style(method_focused)),
        ]),
        text_row("Path", &draft.path, focus == Some(Field::Path), true),
        text_row("Body", &draft.body_text, focus == Some(Field::Body), true),
        checkbox_row(
            "Authenticated",
            draft.authenticated,
            focus == Some(Field::TesterAuthenticated),
        ),
        Line::from(button(
            "Send",
            focus == Some(Field::SendRequest),
            tester.can_send(),
        )),
        summary,
    ];
    frame.render_widget(Paragraph::new(lines), form_area);

    if let Some(response) = tester.response() {
        let body = response.formatted_body();
        frame.render_stateful_widget(TextBlock::new(&body), body_area, scroll);
    }
}
