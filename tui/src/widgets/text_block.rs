//! TextBlock Widget
//!
//! A borderless, scrollable text region for response bodies and streamed
//! chat output.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

/// State for a scrollable text block
#[derive(Debug, Default)]
pub struct TextBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines after wrapping
    pub total_lines: usize,
    /// Keep the last line in view as content grows
    pub follow: bool,
}

impl TextBlockState {
    /// State that sticks to the bottom while text streams in
    #[must_use]
    pub fn following() -> Self {
        Self {
            follow: true,
            ..Self::default()
        }
    }

    /// Scroll by delta (positive = down); scrolling up stops following
    pub fn scroll(&mut self, delta: i32) {
        let offset = i64::try_from(self.scroll_offset).unwrap_or(i64::MAX) + i64::from(delta);
        self.scroll_offset = usize::try_from(offset.max(0)).unwrap_or(0);
        if delta < 0 {
            self.follow = false;
        }
    }

    /// Back to the top
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }
}

/// Wrap text to `width` columns, keeping blank lines
#[must_use]
pub fn wrap_lines(content: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    content
        .lines()
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                wrap(line, width)
                    .into_iter()
                    .map(|cow| cow.to_string())
                    .collect()
            }
        })
        .collect()
}

/// A borderless, scrollable text block
pub struct TextBlock<'a> {
    content: &'a str,
    style: Style,
}

impl<'a> TextBlock<'a> {
    /// Block showing `content`
    #[must_use]
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            style: Style::default(),
        }
    }

    /// Text style
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let wrapped = wrap_lines(self.content, area.width as usize);
        state.total_lines = wrapped.len();

        let max_scroll = state.total_lines.saturating_sub(area.height as usize);
        state.scroll_offset = if state.follow {
            max_scroll
        } else {
            state.scroll_offset.min(max_scroll)
        };

        for (y, line) in (area.y..area.y + area.height).zip(
            wrapped
                .iter()
                .skip(state.scroll_offset)
                .take(area.height as usize),
        ) {
            buf.set_string(area.x, y, line, self.style);
        }
    }
}
