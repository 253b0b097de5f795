//! Harness Messages
//!
//! Results delivered by spawned client calls back to the [`Harness`].
//! Every message carries what the receiving section needs to decide
//! whether the result is still current; the harness applies them in
//! arrival order on the caller's task.
//!
//! [`Harness`]: crate::Harness

use serde_json::Value;

use crate::auth::AuthAction;
use crate::client::{ApiResult, ChatChunk, ModelList};
use crate::error::{ClientError, StreamError};

/// A completed background call
#[derive(Clone, Debug)]
pub enum HarnessMessage {
    // ============================================
    // Connection / Auth
    // ============================================
    /// Client and server state were re-probed
    StateRefreshed,

    /// A login or logout finished successfully
    AuthActionSettled {
        /// Which action
        action: AuthAction,
    },

    /// A login or logout failed
    AuthActionFailed {
        /// Which action
        action: AuthAction,
        /// Failure
        error: ClientError,
    },

    /// The setup flow could not be shown
    SetupFailed {
        /// Failure
        error: ClientError,
    },

    // ============================================
    // Request Tester
    // ============================================
    /// A tester request finished
    ApiCompleted {
        /// Tester generation the request was sent under
        generation: u64,
        /// Outcome
        result: ApiResult<Value>,
    },

    // ============================================
    // Streaming Chat
    // ============================================
    /// The model list request finished
    ModelsFetched {
        /// Chat generation the request was sent under
        generation: u64,
        /// Outcome
        result: ApiResult<ModelList>,
    },

    /// One chunk of a chat stream
    ChatChunk {
        /// Chat generation the stream belongs to
        generation: u64,
        /// Chunk
        chunk: ChatChunk,
    },

    /// A chat stream ended
    ChatFinished {
        /// Chat generation the stream belongs to
        generation: u64,
        /// `Err` when the stream failed to open or broke off
        result: Result<(), StreamError>,
    },
}

impl HarnessMessage {
    /// Short name for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StateRefreshed => "state_refreshed",
            Self::AuthActionSettled { .. } => "auth_settled",
            Self::AuthActionFailed { .. } => "auth_failed",
            Self::SetupFailed { .. } => "setup_failed",
            Self::ApiCompleted { .. } => "api_completed",
            Self::ModelsFetched { .. } => "models_fetched",
            Self::ChatChunk { .. } => "chat_chunk",
            Self::ChatFinished { .. } => "chat_finished",
        }
    }
}
