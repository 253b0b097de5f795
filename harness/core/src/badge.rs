//! Status Badges
//!
//! Small labelled markers every section uses to show where it is.

use serde::Serialize;

/// Visual weight of a badge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BadgeVariant {
    /// Settled and good
    Success,
    /// In progress
    Warning,
    /// Neutral / idle
    Secondary,
    /// Failed
    Destructive,
}

/// A labelled badge
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Badge {
    /// Visual weight
    pub variant: BadgeVariant,
    /// Text shown inside the badge
    pub label: String,
}

impl Badge {
    /// Create a badge
    pub fn new(variant: BadgeVariant, label: impl Into<String>) -> Self {
        Self {
            variant,
            label: label.into(),
        }
    }

    /// Badge for a ready flag plus a state label
    ///
    /// Ready maps to success, the exact label "initializing" to warning,
    /// anything else to the neutral variant. The capitalised overall
    /// "Initializing" label is therefore neutral.
    pub fn for_state(ready: bool, label: impl Into<String>) -> Self {
        let label = label.into();
        let variant = if ready {
            BadgeVariant::Success
        } else if label == crate::state::INITIALIZING {
            BadgeVariant::Warning
        } else {
            BadgeVariant::Secondary
        };
        Self { variant, label }
    }
}
