//! Harness - the orchestrator behind every surface
//!
//! Owns the client context and the two interactive sections. Operations
//! that talk to the server are spawned onto the runtime; their results come
//! back as [`HarnessMessage`]s over an internal channel and are applied in
//! arrival order by [`Harness::poll`] or [`Harness::process_next`].
//!
//! A surface calls `poll()` once per frame, then renders from the
//! accessors. Nothing here blocks.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::auth::{AuthAction, AuthView};
use crate::chat::ChatSession;
use crate::client::BodhiClient;
use crate::context::{ClientContext, ProviderConfig};
use crate::messages::HarnessMessage;
use crate::status::StatusView;
use crate::tester::ApiTester;

/// Capacity of the result channel
const MESSAGE_CHANNEL_CAPACITY: usize = 256;

/// Orchestrator for the status, auth, tester and chat sections
pub struct Harness<C: BodhiClient + ?Sized + 'static> {
    context: ClientContext<C>,
    tester: ApiTester,
    chat: ChatSession,
    notice: Option<String>,
    tx: mpsc::Sender<HarnessMessage>,
    rx: mpsc::Receiver<HarnessMessage>,
}

impl<C: BodhiClient + ?Sized + 'static> Harness<C> {
    /// Create a harness around a pre-constructed client
    pub fn new(client: Arc<C>, config: ProviderConfig) -> Self {
        let (tx, rx) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);
        Self {
            context: ClientContext::new(client, config),
            tester: ApiTester::new(),
            chat: ChatSession::new(),
            notice: None,
            tx,
            rx,
        }
    }

    // ============================================
    // Accessors
    // ============================================

    /// Shared client context
    #[must_use]
    pub fn context(&self) -> &ClientContext<C> {
        &self.context
    }

    /// Request tester section
    #[must_use]
    pub fn tester(&self) -> &ApiTester {
        &self.tester
    }

    /// Request tester section, for form edits
    pub fn tester_mut(&mut self) -> &mut ApiTester {
        &mut self.tester
    }

    /// Streaming chat section
    #[must_use]
    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    /// Streaming chat section, for form edits
    pub fn chat_mut(&mut self) -> &mut ChatSession {
        &mut self.chat
    }

    /// Last auth or setup failure, cleared by the next successful action
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Connection status view
    #[must_use]
    pub fn status_view(&self) -> StatusView {
        StatusView::derive(&self.context.client_state())
    }

    /// Authentication view
    #[must_use]
    pub fn auth_view(&self) -> AuthView {
        AuthView::derive(&self.context.auth(), self.context.is_auth_loading())
    }

    // ============================================
    // Connection / Auth
    // ============================================

    /// Re-probe client and server state in the background
    pub fn refresh_state(&self) {
        let context = self.context.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            context.refresh_state().await;
            let _ = tx.send(HarnessMessage::StateRefreshed).await;
        });
    }

    /// Start a login; ignored while an auth action is in flight
    pub fn login(&mut self) -> bool {
        self.spawn_auth_action(AuthAction::Login)
    }

    /// Start a logout; ignored while an auth action is in flight
    pub fn logout(&mut self) -> bool {
        self.spawn_auth_action(AuthAction::Logout)
    }

    /// Run whichever of login or logout the auth view currently offers
    pub fn toggle_auth(&mut self) -> bool {
        let action = self.auth_view().action;
        self.spawn_auth_action(action)
    }

    fn spawn_auth_action(&mut self, action: AuthAction) -> bool {
        if self.context.is_auth_loading() {
            debug!(%action, "Auth action already in flight");
            return false;
        }
        // Raised here so the very next frame already renders the loading label.
        let guard = self.context.raise_auth_loading();
        let context = self.context.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = context.perform_auth_action(action).await;
            drop(guard);
            let msg = match result {
                Ok(()) => HarnessMessage::AuthActionSettled { action },
                Err(error) => HarnessMessage::AuthActionFailed { action, error },
            };
            let _ = tx.send(msg).await;
        });
        true
    }

    /// Show the client's setup flow in the background
    pub fn show_setup(&self) {
        let context = self.context.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Err(error) = context.show_setup().await {
                let _ = tx.send(HarnessMessage::SetupFailed { error }).await;
            }
        });
    }

    // ============================================
    // Request Tester
    // ============================================

    /// Dispatch the tester's draft; ignored while a request is in flight
    pub fn send_request(&mut self) -> bool {
        let Some(pending) = self.tester.begin_send() else {
            return false;
        };
        let client = Arc::clone(self.context.client());
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.send_api_request(&pending.request).await;
            let _ = tx
                .send(HarnessMessage::ApiCompleted {
                    generation: pending.generation,
                    result,
                })
                .await;
        });
        true
    }

    /// Reset the tester; a late result for the cleared request is dropped
    pub fn clear_response(&mut self) {
        self.tester.clear();
    }

    // ============================================
    // Streaming Chat
    // ============================================

    /// Fetch the model list; ignored while fetching or streaming
    pub fn refresh_models(&mut self) -> bool {
        let Some(generation) = self.chat.begin_refresh() else {
            return false;
        };
        let client = Arc::clone(self.context.client());
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_models().await;
            let _ = tx
                .send(HarnessMessage::ModelsFetched { generation, result })
                .await;
        });
        true
    }

    /// Start a chat stream; ignored when a field is blank or the section is busy
    pub fn send_chat(&mut self) -> bool {
        let Some(pending) = self.chat.begin_send() else {
            return false;
        };
        let client = Arc::clone(self.context.client());
        let tx = self.tx.clone();
        let generation = pending.generation;
        tokio::spawn(async move {
            let result = match client.stream_chat(&pending.request).await {
                Ok(mut stream) => loop {
                    match stream.next().await {
                        Some(Ok(chunk)) => {
                            let msg = HarnessMessage::ChatChunk { generation, chunk };
                            if tx.send(msg).await.is_err() {
                                return;
                            }
                        }
                        Some(Err(e)) => break Err(e),
                        None => break Ok(()),
                    }
                },
                Err(e) => Err(e),
            };
            let _ = tx
                .send(HarnessMessage::ChatFinished { generation, result })
                .await;
        });
        true
    }

    // ============================================
    // Message Processing
    // ============================================

    /// Apply the results that have already arrived
    ///
    /// Stops right after a chat chunk so a surface can redraw once per
    /// chunk; call again while [`Harness::has_pending`] holds. Returns true
    /// if anything was applied.
    pub fn poll(&mut self) -> bool {
        let mut applied = false;
        while let Ok(msg) = self.rx.try_recv() {
            let chunk = matches!(msg, HarnessMessage::ChatChunk { .. });
            self.apply(msg);
            applied = true;
            if chunk {
                break;
            }
        }
        applied
    }

    /// Results are waiting to be applied
    pub fn has_pending(&self) -> bool {
        !self.rx.is_empty()
    }

    /// Wait for the next result and apply it
    ///
    /// Returns false only if the channel has closed, which cannot happen
    /// while the harness holds its own sender.
    pub async fn process_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(msg) => {
                self.apply(msg);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, msg: HarnessMessage) {
        debug!(kind = msg.kind(), "Applying harness message");
        match msg {
            HarnessMessage::StateRefreshed => {}
            HarnessMessage::AuthActionSettled { action } => {
                info!(%action, "Auth action completed");
                self.notice = None;
            }
            HarnessMessage::AuthActionFailed { action, error } => {
                warn!(%action, error = %error, "Auth action failed");
                self.notice = Some(format!("{} failed: {error}", action.title()));
            }
            HarnessMessage::SetupFailed { error } => {
                warn!(error = %error, "Setup failed");
                self.notice = Some(format!("Setup failed: {error}"));
            }
            HarnessMessage::ApiCompleted { generation, result } => {
                self.tester.finish(generation, result);
            }
            HarnessMessage::ModelsFetched { generation, result } => {
                self.chat.finish_refresh(generation, result);
            }
            HarnessMessage::ChatChunk { generation, chunk } => {
                self.chat.apply_chunk(generation, &chunk);
            }
            HarnessMessage::ChatFinished { generation, result } => {
                self.chat.finish_stream(generation, result);
            }
        }
    }
}
