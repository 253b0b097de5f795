//! Client Traits
//!
//! Trait and wire types for the client SDK the harness exercises. The
//! harness never talks to the network directly: every section goes through
//! a [`BodhiClient`], so a scripted client can stand in for the real one.
//!
//! # Results
//!
//! Plain requests settle into an [`ApiResult`], which distinguishes three
//! outcomes:
//! - `Success`: a response with a status below 400
//! - `Error`: a response with a status of 400 or above
//! - `OperationError`: no response at all (transport failure)

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::auth::AuthState;
use crate::error::{error_body_message, ClientError, StreamError};
use crate::state::ClientState;

/// Body of an outgoing request
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// Parsed JSON, sent as `application/json`
    Json(Value),
    /// Raw text, sent verbatim
    Text(String),
}

impl RequestBody {
    /// Parse body text leniently
    ///
    /// Blank text means no body. Text that parses as JSON is sent as JSON,
    /// anything else is sent verbatim rather than rejected.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Some(Self::Json(value)),
            Err(_) => Some(Self::Text(text.to_string())),
        }
    }
}

/// A generic API request
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    /// HTTP method (e.g. "GET")
    pub method: String,
    /// Path relative to the server root
    pub path: String,
    /// Optional body
    pub body: Option<RequestBody>,
    /// Extra headers
    pub headers: BTreeMap<String, String>,
    /// Send with the session's credentials
    pub authenticated: bool,
}

impl ApiRequest {
    /// Create an anonymous request without a body
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body: None,
            headers: BTreeMap::new(),
            authenticated: false,
        }
    }

    /// Set the body
    #[must_use]
    pub fn with_body(mut self, body: Option<RequestBody>) -> Self {
        self.body = body;
        self
    }

    /// Add an extra header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Select credentialed or anonymous dispatch
    #[must_use]
    pub fn with_authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }
}

/// A response with a status below 400
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse<T> {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: BTreeMap<String, String>,
    /// Decoded body
    pub body: T,
}

/// A response with a status of 400 or above
#[derive(Clone, Debug, PartialEq)]
pub struct ApiErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: BTreeMap<String, String>,
    /// Error body, JSON when the server sent JSON, a string otherwise
    pub body: Value,
}

impl ApiErrorResponse {
    /// `error.message` from the body, if present
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        error_body_message(&self.body)
    }
}

/// Transport-level failure: no response was received
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationError {
    /// Failure description
    pub message: String,
}

impl OperationError {
    /// Create an operation error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of a plain (non-streaming) request
#[derive(Clone, Debug, PartialEq)]
pub enum ApiResult<T> {
    /// Response with a status below 400
    Success(ApiResponse<T>),
    /// Response with a status of 400 or above
    Error(ApiErrorResponse),
    /// No response
    OperationError(OperationError),
}

impl<T> ApiResult<T> {
    /// Shorthand for a transport failure
    pub fn operation_error(message: impl Into<String>) -> Self {
        Self::OperationError(OperationError::new(message))
    }

    /// HTTP status, `None` for transport failures
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success(r) => Some(r.status),
            Self::Error(r) => Some(r.status),
            Self::OperationError(_) => None,
        }
    }

    /// Whether the request succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Convert the success body, keeping failures as they are
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            Self::Success(r) => ApiResult::Success(ApiResponse {
                status: r.status,
                headers: r.headers,
                body: f(r.body),
            }),
            Self::Error(e) => ApiResult::Error(e),
            Self::OperationError(e) => ApiResult::OperationError(e),
        }
    }
}

/// One entry of the model list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model identifier
    pub id: String,
}

/// Body of a successful model list request
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelList {
    /// Available models
    #[serde(default)]
    pub data: Vec<ModelDescriptor>,
}

impl ModelList {
    /// Model identifiers in server order
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.data.iter().map(|m| m.id.clone()).collect()
    }
}

/// A streaming chat request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// User prompt
    pub prompt: String,
    /// Send with the session's credentials
    pub authenticated: bool,
}

impl ChatRequest {
    /// Create a chat request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, authenticated: bool) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            authenticated,
        }
    }
}

/// Incremental content of one choice
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDelta {
    /// Text delta
    #[serde(default)]
    pub content: Option<String>,
}

/// One choice of a streamed chunk
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkChoice {
    /// Incremental content
    #[serde(default)]
    pub delta: Option<ChunkDelta>,
}

/// One incremental unit of a streamed response
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChunk {
    /// Choices carried by this chunk
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

impl ChatChunk {
    /// Chunk carrying a single text delta
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            choices: vec![ChunkChoice {
                delta: Some(ChunkDelta {
                    content: Some(content.into()),
                }),
            }],
        }
    }

    /// Text delta of the first choice, empty if absent
    #[must_use]
    pub fn delta_text(&self) -> &str {
        self.choices
            .first()
            .and_then(|c| c.delta.as_ref())
            .and_then(|d| d.content.as_deref())
            .unwrap_or("")
    }
}

/// Item yielded by a chat stream
pub type ChatStreamItem = Result<ChatChunk, StreamError>;

/// Producer half of a [`ChatStream`]
pub type ChatStreamSender = mpsc::Sender<ChatStreamItem>;

/// A finite, forward-only sequence of chat chunks
///
/// Chunks are yielded in delivery order. An `Err` item ends the stream.
#[derive(Debug)]
pub struct ChatStream {
    rx: mpsc::Receiver<ChatStreamItem>,
}

impl ChatStream {
    /// Wrap a receiver
    #[must_use]
    pub fn new(rx: mpsc::Receiver<ChatStreamItem>) -> Self {
        Self { rx }
    }

    /// Create a bounded stream and its producer
    #[must_use]
    pub fn channel(capacity: usize) -> (ChatStreamSender, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx))
    }

    /// Next chunk, `None` once the producer is done
    pub async fn next(&mut self) -> Option<ChatStreamItem> {
        self.rx.recv().await
    }
}

/// Client SDK seam
///
/// Implement this trait to drive the harness against a different client.
#[async_trait]
pub trait BodhiClient: Send + Sync {
    /// Client name for logs
    fn name(&self) -> &str;

    /// Current connection state snapshot
    fn client_state(&self) -> ClientState;

    /// Re-probe the client and server and update [`Self::client_state`]
    async fn refresh_state(&self) {}

    /// Current authentication state
    fn auth(&self) -> AuthState;

    /// Start a session
    async fn login(&self) -> Result<(), ClientError>;

    /// End the session
    async fn logout(&self) -> Result<(), ClientError>;

    /// Show the client's setup flow
    async fn show_setup(&self) -> Result<(), ClientError>;

    /// Dispatch one generic request
    async fn send_api_request(&self, request: &ApiRequest) -> ApiResult<Value>;

    /// List available models
    async fn fetch_models(&self) -> ApiResult<ModelList>;

    /// Open a token stream for a chat request
    ///
    /// Failures before the first chunk are returned here; failures during
    /// iteration arrive as an `Err` item on the stream.
    async fn stream_chat(&self, request: &ChatRequest) -> Result<ChatStream, StreamError>;
}
