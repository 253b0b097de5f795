//! Client Context Provider
//!
//! Holds the single client handle and re-exports its reactive state to the
//! sections. The handle is injected by the caller; the context owns no
//! state of its own beyond the auth-loading flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::auth::{AuthAction, AuthState};
use crate::client::BodhiClient;
use crate::config::AppConfig;
use crate::error::ClientError;
use crate::state::ClientState;

/// Provider settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Base path for routed deployment
    pub base_path: String,
    /// Path the auth flow returns to
    pub callback_path: String,
    /// Client log verbosity
    pub log_level: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            callback_path: "/callback".to_string(),
            log_level: "debug".to_string(),
        }
    }
}

impl From<&AppConfig> for ProviderConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_path: config.base_path.clone(),
            callback_path: config.callback_path(),
            log_level: config.log_level.clone(),
        }
    }
}

/// Raised auth-loading flag, lowered on drop even when the action fails
#[must_use = "the loading flag drops as soon as the guard does"]
pub struct AuthLoadingGuard(Arc<AtomicBool>);

impl AuthLoadingGuard {
    fn raise(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(Arc::clone(flag))
    }
}

impl Drop for AuthLoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Shared client handle plus derived state
///
/// Cheap to clone; clones share the handle and the loading flag.
pub struct ClientContext<C: BodhiClient + ?Sized> {
    client: Arc<C>,
    config: ProviderConfig,
    auth_loading: Arc<AtomicBool>,
}

impl<C: BodhiClient + ?Sized> Clone for ClientContext<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            config: self.config.clone(),
            auth_loading: Arc::clone(&self.auth_loading),
        }
    }
}

impl<C: BodhiClient + ?Sized> ClientContext<C> {
    /// Wrap a pre-constructed client
    pub fn new(client: Arc<C>, config: ProviderConfig) -> Self {
        debug!(client = client.name(), log_level = %config.log_level, "Client context created");
        Self {
            client,
            config,
            auth_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The client handle
    #[must_use]
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Provider settings
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Current connection state
    #[must_use]
    pub fn client_state(&self) -> ClientState {
        self.client.client_state()
    }

    /// Current authentication state
    #[must_use]
    pub fn auth(&self) -> AuthState {
        self.client.auth()
    }

    /// Whether a login or logout is in flight
    #[must_use]
    pub fn is_auth_loading(&self) -> bool {
        self.auth_loading.load(Ordering::SeqCst)
    }

    /// Start a session
    pub async fn login(&self) -> Result<(), ClientError> {
        self.run_auth_action(AuthAction::Login).await
    }

    /// End the session
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.run_auth_action(AuthAction::Logout).await
    }

    /// Show the client's setup flow
    pub async fn show_setup(&self) -> Result<(), ClientError> {
        self.client.show_setup().await
    }

    /// Re-probe client and server state
    pub async fn refresh_state(&self) {
        self.client.refresh_state().await;
    }

    /// Raise the auth-loading flag until the returned guard drops
    pub fn raise_auth_loading(&self) -> AuthLoadingGuard {
        AuthLoadingGuard::raise(&self.auth_loading)
    }

    /// Run a login or logout with the loading flag raised for its duration
    pub async fn run_auth_action(&self, action: AuthAction) -> Result<(), ClientError> {
        let _guard = self.raise_auth_loading();
        self.perform_auth_action(action).await
    }

    pub(crate) async fn perform_auth_action(&self, action: AuthAction) -> Result<(), ClientError> {
        debug!(%action, "Auth action started");
        match action {
            AuthAction::Login => self.client.login().await,
            AuthAction::Logout => self.client.logout().await,
        }
    }
}
