//! Keyboard focus
//!
//! Focus is a section plus a field within it. Tab moves between sections,
//! Up/Down between the fields of one section.

/// The four panels, in tab order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    /// Connection status
    Status,
    /// Login / logout
    Auth,
    /// Generic request tester
    Tester,
    /// Streaming chat
    Chat,
}

impl Section {
    const ORDER: [Section; 4] = [Self::Status, Self::Auth, Self::Tester, Self::Chat];

    /// Focusable fields of this section
    #[must_use]
    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::Status => &[Field::SetupButton],
            Self::Auth => &[Field::AuthButton],
            Self::Tester => &[
                Field::Method,
                Field::Path,
                Field::Body,
                Field::TesterAuthenticated,
                Field::SendRequest,
            ],
            Self::Chat => &[
                Field::Model,
                Field::Prompt,
                Field::ChatAuthenticated,
                Field::RefreshModels,
                Field::SendChat,
            ],
        }
    }

    /// Panel title
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Status => "Status",
            Self::Auth => "Auth",
            Self::Tester => "API Test",
            Self::Chat => "Chat",
        }
    }

    fn index(self) -> usize {
        Self::ORDER.iter().position(|s| *s == self).unwrap_or(0)
    }
}

/// A focusable control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// "Setup" button
    SetupButton,
    /// Login / Logout button
    AuthButton,
    /// HTTP method selector
    Method,
    /// Request path input
    Path,
    /// Request body input
    Body,
    /// Tester "Authenticated" checkbox
    TesterAuthenticated,
    /// "Send" button
    SendRequest,
    /// Model input
    Model,
    /// Prompt input
    Prompt,
    /// Chat "Authenticated" checkbox
    ChatAuthenticated,
    /// "Refresh models" button
    RefreshModels,
    /// "Send" button
    SendChat,
}

impl Field {
    /// Whether typing edits this field
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Path | Self::Body | Self::Model | Self::Prompt)
    }
}

/// Current focus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Focus {
    section: Section,
    field: usize,
}

impl Default for Focus {
    fn default() -> Self {
        Self {
            section: Section::Tester,
            field: 0,
        }
    }
}

impl Focus {
    /// Focused section
    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    /// Focused field
    #[must_use]
    pub fn field(&self) -> Field {
        let fields = self.section.fields();
        fields[self.field.min(fields.len() - 1)]
    }

    /// Focused field if it belongs to `section`
    #[must_use]
    pub fn field_in(&self, section: Section) -> Option<Field> {
        (self.section == section).then(|| self.field())
    }

    /// Next (or previous) section, wrapping; lands on its first field
    pub fn cycle_section(&mut self, forward: bool) {
        let len = Section::ORDER.len();
        let i = self.section.index();
        let next = if forward { (i + 1) % len } else { (i + len - 1) % len };
        self.section = Section::ORDER[next];
        self.field = 0;
    }

    /// Next (or previous) field within the section, clamped
    pub fn move_field(&mut self, forward: bool) {
        let last = self.section.fields().len() - 1;
        self.field = if forward {
            (self.field + 1).min(last)
        } else {
            self.field.saturating_sub(1)
        };
    }

    /// Jump to a field
    pub fn focus(&mut self, section: Section, field: Field) {
        self.section = section;
        self.field = section
            .fields()
            .iter()
            .position(|f| *f == field)
            .unwrap_or(0);
    }
}
