//! Auth Control
//!
//! Authentication state as reported by the client, and the view the auth
//! section renders from it. The section never drives the OAuth handshake
//! itself; it reflects whatever state the client settles into.

use serde::{Deserialize, Serialize};

use crate::badge::{Badge, BadgeVariant};

/// Placeholder for identity fields the client did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// Identity claims of a logged-in user
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Preferred username claim
    #[serde(default, alias = "username")]
    pub preferred_username: Option<String>,
    /// Email claim
    #[serde(default)]
    pub email: Option<String>,
    /// Display name claim
    #[serde(default)]
    pub name: Option<String>,
}

/// Authentication state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    /// No active session
    #[default]
    LoggedOut,
    /// Active session with identity claims
    LoggedIn(UserInfo),
}

impl AuthState {
    /// Whether a session is active
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn(_))
    }

    /// Identity claims, if logged in
    #[must_use]
    pub fn user_info(&self) -> Option<&UserInfo> {
        match self {
            Self::LoggedIn(info) => Some(info),
            Self::LoggedOut => None,
        }
    }
}

/// The action the auth section offers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AuthAction {
    /// Start a session
    Login,
    /// End the session
    Logout,
}

impl AuthAction {
    /// Short name used in notices
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Logout => "Logout",
        }
    }

    /// Button label, busy or idle
    ///
    /// The login label names the mechanism: a pre-provisioned token.
    #[must_use]
    pub fn label(self, loading: bool) -> &'static str {
        match (self, loading) {
            (Self::Login, false) => "Login with token",
            (Self::Login, true) => "Logging in...",
            (Self::Logout, false) => "Logout",
            (Self::Logout, true) => "Logging out...",
        }
    }
}

impl std::fmt::Display for AuthAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Logout => write!(f, "logout"),
        }
    }
}

/// Rendered auth section
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthView {
    /// Session active
    pub logged_in: bool,
    /// "Authenticated" badge when logged in
    pub badge: Option<Badge>,
    /// Username or `N/A`
    pub username: String,
    /// Email or `N/A`
    pub email: String,
    /// Display name or `N/A`
    pub name: String,
    /// Action offered by the button
    pub action: AuthAction,
    /// Button label
    pub action_label: &'static str,
    /// Button enabled (false while a transition is in flight)
    pub action_enabled: bool,
}

impl AuthView {
    /// Derive the view from auth state and the auth-loading flag
    #[must_use]
    pub fn derive(auth: &AuthState, loading: bool) -> Self {
        let info = auth.user_info();
        let field = |value: Option<&String>| {
            value
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };

        let action = if auth.is_logged_in() {
            AuthAction::Logout
        } else {
            AuthAction::Login
        };

        Self {
            logged_in: auth.is_logged_in(),
            badge: auth
                .is_logged_in()
                .then(|| Badge::new(BadgeVariant::Success, "Authenticated")),
            username: field(info.and_then(|i| i.preferred_username.as_ref())),
            email: field(info.and_then(|i| i.email.as_ref())),
            name: field(info.and_then(|i| i.name.as_ref())),
            action,
            action_label: action.label(loading),
            action_enabled: !loading,
        }
    }
}
