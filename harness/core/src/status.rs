//! Status Display
//!
//! Pure derivation of the status section from a [`ClientState`] snapshot.

use serde::Serialize;

use crate::badge::Badge;
use crate::state::ClientState;

/// Rendered status section
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusView {
    /// Both sub-systems ready
    pub is_ready: bool,
    /// Still starting up
    pub is_initializing: bool,
    /// Overall badge ("Ready", "Initializing" or "Not Ready")
    pub overall: Badge,
    /// Client sub-system badge
    pub client: Badge,
    /// Server sub-system badge
    pub server: Badge,
}

impl StatusView {
    /// Derive the view from the client's current state
    #[must_use]
    pub fn derive(state: &ClientState) -> Self {
        let is_ready = state.is_overall_ready();
        let is_initializing = state.is_initializing();

        let overall_label = if is_ready {
            "Ready"
        } else if is_initializing {
            "Initializing"
        } else {
            "Not Ready"
        };

        Self {
            is_ready,
            is_initializing,
            overall: Badge::for_state(is_ready, overall_label),
            client: Badge::for_state(state.client.ready, state.client.label.clone()),
            server: Badge::for_state(state.server.ready, state.server.label.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::BadgeVariant;
    use crate::state::SubsystemState;

    #[test]
    fn test_ready_state_is_success() {
        let state = ClientState {
            client: SubsystemState::ready("direct"),
            server: SubsystemState::ready("ready"),
        };
        let view = StatusView::derive(&state);

        assert!(view.is_ready);
        assert_eq!(view.overall, Badge::new(BadgeVariant::Success, "Ready"));
        assert_eq!(view.client, Badge::new(BadgeVariant::Success, "direct"));
        assert_eq!(view.server, Badge::new(BadgeVariant::Success, "ready"));
    }

    #[test]
    fn test_initializing_server_is_warning_overall_is_neutral() {
        let view = StatusView::derive(&ClientState::default());

        assert!(view.is_initializing);
        assert_eq!(view.overall.variant, BadgeVariant::Secondary);
        assert_eq!(view.overall.label, "Initializing");
        assert_eq!(view.server.variant, BadgeVariant::Warning);
    }

    #[test]
    fn test_not_ready_state_is_neutral() {
        let state = ClientState {
            client: SubsystemState::ready("direct"),
            server: SubsystemState::not_ready("unreachable"),
        };
        let view = StatusView::derive(&state);

        assert_eq!(view.overall, Badge::new(BadgeVariant::Secondary, "Not Ready"));
        assert_eq!(
            view.server,
            Badge::new(BadgeVariant::Secondary, "unreachable")
        );
    }
}
