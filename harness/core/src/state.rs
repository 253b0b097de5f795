//! Client State
//!
//! Snapshot of the client's reactive connection state. Two sub-systems are
//! tracked independently: the client itself ("client init") and the server
//! it talks to.

use serde::{Deserialize, Serialize};

/// Label used by sub-systems that have not settled yet
pub const INITIALIZING: &str = "initializing";

/// Coarse connection state of one sub-system
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Still starting up
    Initializing,
    /// Usable
    Ready,
    /// Settled, but not usable
    NotReady,
}

/// State of a single sub-system as reported by the client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsystemState {
    /// Whether the sub-system is usable
    pub ready: bool,
    /// Textual state name (e.g. "ready", "initializing", "unreachable")
    pub label: String,
}

impl SubsystemState {
    /// A sub-system that is still starting
    #[must_use]
    pub fn initializing() -> Self {
        Self {
            ready: false,
            label: INITIALIZING.to_string(),
        }
    }

    /// A usable sub-system with the given label
    pub fn ready(label: impl Into<String>) -> Self {
        Self {
            ready: true,
            label: label.into(),
        }
    }

    /// A settled but unusable sub-system
    pub fn not_ready(label: impl Into<String>) -> Self {
        Self {
            ready: false,
            label: label.into(),
        }
    }

    /// Collapse to a [`ConnectionState`]
    #[must_use]
    pub fn connection(&self) -> ConnectionState {
        if self.ready {
            ConnectionState::Ready
        } else if self.label == INITIALIZING {
            ConnectionState::Initializing
        } else {
            ConnectionState::NotReady
        }
    }
}

impl Default for SubsystemState {
    fn default() -> Self {
        Self::initializing()
    }
}

/// Combined client/server state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    /// Client initialisation
    pub client: SubsystemState,
    /// Server reachability and readiness
    pub server: SubsystemState,
}

impl ClientState {
    /// Both sub-systems are ready
    #[must_use]
    pub fn is_overall_ready(&self) -> bool {
        self.client.ready && self.server.ready
    }

    /// Not ready, and at least one sub-system is still starting
    #[must_use]
    pub fn is_initializing(&self) -> bool {
        !self.is_overall_ready()
            && (self.client.connection() == ConnectionState::Initializing
                || self.server.connection() == ConnectionState::Initializing)
    }

    /// Overall connection state
    #[must_use]
    pub fn overall(&self) -> ConnectionState {
        if self.is_overall_ready() {
            ConnectionState::Ready
        } else if self.is_initializing() {
            ConnectionState::Initializing
        } else {
            ConnectionState::NotReady
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_initializing() {
        let state = ClientState::default();
        assert!(!state.is_overall_ready());
        assert!(state.is_initializing());
        assert_eq!(state.overall(), ConnectionState::Initializing);
    }

    #[test]
    fn test_overall_ready_requires_both() {
        let mut state = ClientState {
            client: SubsystemState::ready("direct"),
            server: SubsystemState::not_ready("unreachable"),
        };
        assert_eq!(state.overall(), ConnectionState::NotReady);

        state.server = SubsystemState::ready("ready");
        assert_eq!(state.overall(), ConnectionState::Ready);
    }

    #[test]
    fn test_subsystem_connection() {
        assert_eq!(
            SubsystemState::initializing().connection(),
            ConnectionState::Initializing
        );
        assert_eq!(
            SubsystemState::not_ready("setup").connection(),
            ConnectionState::NotReady
        );
    }
}
