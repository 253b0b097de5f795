//! Error Types
//!
//! Failures surfaced by the client seam. Section state machines never
//! propagate these past their own boundary: they turn them into a status
//! and a user-facing message.

use serde_json::Value;
use thiserror::Error;

/// Errors returned by session-lifecycle actions (login, logout, setup)
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ClientError {
    /// Authentication could not be performed
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with an error status
    #[error("server returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Best-effort message extracted from the error body
        message: String,
    },

    /// Setup flow could not be shown
    #[error("setup unavailable: {0}")]
    Setup(String),
}

/// Errors raised while opening or iterating a chat stream
///
/// The variants mirror the shapes a stream failure can take so that each
/// one maps to a distinct message prefix.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StreamError {
    /// Transport failure, no structured response
    #[error("OperationError: {message}")]
    Operation {
        /// Transport error description
        message: String,
    },

    /// Structured, status-coded error response
    #[error("ApiError: {status}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body as returned by the server
        body: Value,
    },

    /// Unclassified runtime failure with a message
    #[error("Error: {0}")]
    Runtime(String),

    /// Arbitrary structured value raised by the stream
    #[error("Error: {0}")]
    Object(Value),

    /// Bare string raised by the stream
    #[error("Error: {0}")]
    Text(String),

    /// Nothing usable to report
    #[error("Failed to stream response")]
    Unknown,
}

/// Fallback message when a stream error carries nothing usable
pub const STREAM_FAILURE_FALLBACK: &str = "Failed to stream response";

impl StreamError {
    /// Create an operation error from any displayable transport failure
    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation {
            message: message.into(),
        }
    }

    /// Message shown to the user for this failure
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Operation { message } => format!("OperationError: {message}"),
            Self::Api { status, body } => match error_body_message(body) {
                Some(message) => format!("ApiError: {message}"),
                None => format!("ApiError: Error {status}"),
            },
            Self::Runtime(message) => format!("Error: {message}"),
            Self::Object(value) => format!("Error: {value}"),
            Self::Text(text) => format!("Error: {text}"),
            Self::Unknown => STREAM_FAILURE_FALLBACK.to_string(),
        }
    }
}

/// Extract `error.message` from an OpenAI-style error body
pub(crate) fn error_body_message(body: &Value) -> Option<&str> {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
}
