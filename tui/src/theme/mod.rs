//! Theme and Colors
//!
//! Badge colours follow the four badge variants; everything else is a
//! small set of accents on the terminal's default background.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use harness_core::{Badge, BadgeVariant};

// ============================================================================
// Badge Palette
// ============================================================================

/// Ready / completed
pub const BADGE_SUCCESS: Color = Color::Rgb(120, 230, 120);

/// In flight / initializing
pub const BADGE_WARNING: Color = Color::Rgb(255, 200, 90);

/// Neutral / not ready
pub const BADGE_SECONDARY: Color = Color::Rgb(150, 150, 150);

/// Failed
pub const BADGE_DESTRUCTIVE: Color = Color::Rgb(255, 80, 80);

// ============================================================================
// UI Colors
// ============================================================================

/// Border and title of the focused section
pub const FOCUS_ACCENT: Color = Color::Cyan;

/// Unfocused borders, hints and placeholders
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error banner text
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Field labels
pub const LABEL: Color = Color::Rgb(170, 170, 200);

/// Colour for a badge variant
#[must_use]
pub fn badge_color(variant: BadgeVariant) -> Color {
    match variant {
        BadgeVariant::Success => BADGE_SUCCESS,
        BadgeVariant::Warning => BADGE_WARNING,
        BadgeVariant::Secondary => BADGE_SECONDARY,
        BadgeVariant::Destructive => BADGE_DESTRUCTIVE,
    }
}

/// A badge rendered as `[label]`
#[must_use]
pub fn badge_span(badge: &Badge) -> Span<'static> {
    Span::styled(
        format!("[{}]", badge.label),
        Style::default()
            .fg(badge_color(badge.variant))
            .add_modifier(Modifier::BOLD),
    )
}

/// Border style for a section
#[must_use]
pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(FOCUS_ACCENT)
    } else {
        Style::default().fg(DIM_GRAY)
    }
}

/// Style for a field row
#[must_use]
pub fn field_style(focused: bool) -> Style {
    if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}
