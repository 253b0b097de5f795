//! Streaming Chat Form
//!
//! Fetches the model list and drives a token-streaming chat call,
//! accumulating incremental text into a display buffer.
//!
//! # Operations
//!
//! - **Refresh models**: `Idle | Ready | Error → Fetching → Ready | Error`
//! - **Send chat**: `→ Streaming → Ready | Error`
//!
//! The response buffer is append-only while a stream runs: after every
//! chunk it holds exactly the concatenation of the deltas received so far.
//! It is reset only when the next send starts.

use tracing::{debug, info, warn};

use crate::badge::{Badge, BadgeVariant};
use crate::client::{ApiResult, BodhiClient, ChatChunk, ChatRequest, ModelList};
use crate::error::StreamError;

/// Section status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChatStatus {
    /// Nothing has happened yet
    #[default]
    Idle,
    /// Model list request in flight
    Fetching,
    /// Last operation succeeded
    Ready,
    /// Chat stream in flight
    Streaming,
    /// Last operation failed
    Error,
}

/// A chat send handed out by [`ChatSession::begin_send`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingChat {
    /// Generation chunks and the final result must be reported under
    pub generation: u64,
    /// Request to stream
    pub request: ChatRequest,
}

/// Streaming chat section
#[derive(Debug)]
pub struct ChatSession {
    status: ChatStatus,
    model_input: String,
    model_suggestions: Vec<String>,
    prompt: String,
    response: String,
    error: Option<String>,
    authenticated: bool,
    generation: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            status: ChatStatus::Idle,
            model_input: String::new(),
            model_suggestions: Vec::new(),
            prompt: String::new(),
            response: String::new(),
            error: None,
            authenticated: true,
            generation: 0,
        }
    }
}

impl ChatSession {
    /// Create an idle session (authenticated by default)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> ChatStatus {
        self.status
    }

    /// Model field contents
    #[must_use]
    pub fn model_input(&self) -> &str {
        &self.model_input
    }

    /// Model ids from the last successful refresh
    #[must_use]
    pub fn model_suggestions(&self) -> &[String] {
        &self.model_suggestions
    }

    /// Prompt field contents
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Accumulated response text
    #[must_use]
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Error banner, if any
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether chat requests are sent with credentials
    #[must_use]
    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    /// Current generation
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fields are locked while a stream runs
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.status != ChatStatus::Streaming
    }

    /// Whether a refresh may start
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        !matches!(self.status, ChatStatus::Fetching | ChatStatus::Streaming)
    }

    /// Whether a send may start
    #[must_use]
    pub fn can_send(&self) -> bool {
        self.can_refresh() && !self.prompt.trim().is_empty() && !self.model_input.trim().is_empty()
    }

    /// Header badge
    #[must_use]
    pub fn badge(&self) -> Badge {
        match self.status {
            ChatStatus::Idle => Badge::new(BadgeVariant::Secondary, "Ready"),
            ChatStatus::Fetching => Badge::new(BadgeVariant::Warning, "Loading"),
            ChatStatus::Ready if self.model_suggestions.is_empty() => {
                Badge::new(BadgeVariant::Success, "Ready")
            }
            ChatStatus::Ready => Badge::new(
                BadgeVariant::Success,
                format!("{} models", self.model_suggestions.len()),
            ),
            ChatStatus::Streaming => Badge::new(BadgeVariant::Warning, "Streaming"),
            ChatStatus::Error => Badge::new(BadgeVariant::Destructive, "Error"),
        }
    }

    /// Set the model field; refused while streaming
    pub fn set_model_input(&mut self, value: impl Into<String>) -> bool {
        if !self.is_editable() {
            return false;
        }
        self.model_input = value.into();
        true
    }

    /// Edit the model field in place; refused while streaming
    pub fn edit_model_input(&mut self, edit: impl FnOnce(&mut String)) -> bool {
        if !self.is_editable() {
            return false;
        }
        edit(&mut self.model_input);
        true
    }

    /// Set the prompt field; refused while streaming
    pub fn set_prompt(&mut self, value: impl Into<String>) -> bool {
        if !self.is_editable() {
            return false;
        }
        self.prompt = value.into();
        true
    }

    /// Edit the prompt field in place; refused while streaming
    pub fn edit_prompt(&mut self, edit: impl FnOnce(&mut String)) -> bool {
        if !self.is_editable() {
            return false;
        }
        edit(&mut self.prompt);
        true
    }

    /// Toggle credentialed streaming
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }

    /// Put the next (or previous) suggestion into the model field
    pub fn cycle_suggestion(&mut self, forward: bool) -> bool {
        if self.model_suggestions.is_empty() || !self.is_editable() {
            return false;
        }
        let len = self.model_suggestions.len();
        let next = match self
            .model_suggestions
            .iter()
            .position(|id| *id == self.model_input)
        {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        self.model_input = self.model_suggestions[next].clone();
        true
    }

    /// Start a model list refresh
    ///
    /// Returns the generation to report under, `None` while busy.
    pub fn begin_refresh(&mut self) -> Option<u64> {
        if !self.can_refresh() {
            return None;
        }
        self.generation += 1;
        self.status = ChatStatus::Fetching;
        self.error = None;
        Some(self.generation)
    }

    /// Record the result of a model list refresh
    pub fn finish_refresh(&mut self, generation: u64, result: ApiResult<ModelList>) -> bool {
        if generation != self.generation || self.status != ChatStatus::Fetching {
            debug!(generation, current = self.generation, "Dropping stale model list");
            return false;
        }

        match result {
            ApiResult::OperationError(e) => {
                warn!(error = %e.message, "Fetch models failed");
                self.fail(format!("Network Error: {}", e.message));
            }
            ApiResult::Error(e) => {
                warn!(status = e.status, "Fetch models failed");
                self.fail(format!("Error {}", e.status));
            }
            ApiResult::Success(response) if response.status >= 400 => {
                warn!(status = response.status, "Fetch models failed");
                self.fail(format!("Error {}", response.status));
            }
            ApiResult::Success(response) => {
                let ids = response.body.ids();
                if self.model_input.is_empty() {
                    if let Some(first) = ids.first() {
                        self.model_input = first.clone();
                    }
                }
                info!(models = ?ids, "Models loaded");
                self.model_suggestions = ids;
                self.status = ChatStatus::Ready;
            }
        }
        true
    }

    /// Start a chat stream
    ///
    /// No-op (`None`) when the model or prompt is blank or the section is
    /// busy. Clears the response buffer.
    pub fn begin_send(&mut self) -> Option<PendingChat> {
        if !self.can_send() {
            return None;
        }
        self.generation += 1;
        self.status = ChatStatus::Streaming;
        self.response.clear();
        self.error = None;

        Some(PendingChat {
            generation: self.generation,
            request: ChatRequest::new(
                self.model_input.trim(),
                self.prompt.clone(),
                self.authenticated,
            ),
        })
    }

    /// Append one chunk's delta to the response buffer
    pub fn apply_chunk(&mut self, generation: u64, chunk: &ChatChunk) -> bool {
        if generation != self.generation || self.status != ChatStatus::Streaming {
            return false;
        }
        self.response.push_str(chunk.delta_text());
        true
    }

    /// Record the end of a chat stream
    ///
    /// The accumulated response stays visible on failure.
    pub fn finish_stream(&mut self, generation: u64, result: Result<(), StreamError>) -> bool {
        if generation != self.generation || self.status != ChatStatus::Streaming {
            debug!(generation, current = self.generation, "Dropping stale stream result");
            return false;
        }
        match result {
            Ok(()) => self.status = ChatStatus::Ready,
            Err(e) => {
                warn!(error = %e, "Stream failed");
                self.fail(e.user_message());
            }
        }
        true
    }

    fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.status = ChatStatus::Error;
    }

    /// Refresh the model list and wait for the result
    pub async fn refresh_models<C: BodhiClient + ?Sized>(&mut self, client: &C) -> bool {
        let Some(generation) = self.begin_refresh() else {
            return false;
        };
        let result = client.fetch_models().await;
        self.finish_refresh(generation, result)
    }

    /// Stream a chat response to completion
    ///
    /// `on_chunk` observes the buffer after every applied chunk.
    pub async fn send_chat<C, F>(&mut self, client: &C, mut on_chunk: F) -> bool
    where
        C: BodhiClient + ?Sized,
        F: FnMut(&str),
    {
        let Some(pending) = self.begin_send() else {
            return false;
        };

        let result = match client.stream_chat(&pending.request).await {
            Ok(mut stream) => loop {
                match stream.next().await {
                    Some(Ok(chunk)) => {
                        self.apply_chunk(pending.generation, &chunk);
                        on_chunk(&self.response);
                    }
                    Some(Err(e)) => break Err(e),
                    None => break Ok(()),
                }
            },
            Err(e) => Err(e),
        };

        self.finish_stream(pending.generation, result)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::client::{ApiErrorResponse, ApiResponse, ModelDescriptor};

    fn models(ids: &[&str]) -> ApiResult<ModelList> {
        ApiResult::Success(ApiResponse {
            status: 200,
            headers: BTreeMap::new(),
            body: ModelList {
                data: ids
                    .iter()
                    .map(|id| ModelDescriptor { id: (*id).to_string() })
                    .collect(),
            },
        })
    }

    #[test]
    fn test_defaults() {
        let chat = ChatSession::new();
        assert_eq!(chat.status(), ChatStatus::Idle);
        assert!(chat.authenticated());
        assert_eq!(chat.badge(), Badge::new(BadgeVariant::Secondary, "Ready"));
    }

    #[test]
    fn test_refresh_prefills_empty_input() {
        let mut chat = ChatSession::new();
        let generation = chat.begin_refresh().unwrap();
        assert_eq!(chat.badge().label, "Loading");

        chat.finish_refresh(generation, models(&["llama3", "gpt-x"]));

        assert_eq!(chat.status(), ChatStatus::Ready);
        assert_eq!(chat.model_input(), "llama3");
        assert_eq!(chat.model_suggestions(), ["llama3", "gpt-x"]);
        assert_eq!(chat.badge().label, "2 models");
    }

    #[test]
    fn test_refresh_never_overwrites_input() {
        let mut chat = ChatSession::new();
        chat.set_model_input("my-model");
        let generation = chat.begin_refresh().unwrap();
        chat.finish_refresh(generation, models(&["llama3"]));

        assert_eq!(chat.model_input(), "my-model");
        assert_eq!(chat.model_suggestions(), ["llama3"]);
    }

    #[test]
    fn test_refresh_errors_have_distinct_prefixes() {
        let mut chat = ChatSession::new();
        let generation = chat.begin_refresh().unwrap();
        chat.finish_refresh(generation, ApiResult::operation_error("connection refused"));
        assert_eq!(chat.status(), ChatStatus::Error);
        assert_eq!(chat.error(), Some("Network Error: connection refused"));

        let generation = chat.begin_refresh().unwrap();
        assert_eq!(chat.error(), None);
        chat.finish_refresh(
            generation,
            ApiResult::Error(ApiErrorResponse {
                status: 401,
                headers: BTreeMap::new(),
                body: json!({"error": {"message": "unauthorized"}}),
            }),
        );
        assert_eq!(chat.error(), Some("Error 401"));
    }

    #[test]
    fn test_failed_refresh_keeps_previous_suggestions() {
        let mut chat = ChatSession::new();
        let generation = chat.begin_refresh().unwrap();
        chat.finish_refresh(generation, models(&["llama3"]));

        let generation = chat.begin_refresh().unwrap();
        chat.finish_refresh(generation, ApiResult::operation_error("down"));
        assert_eq!(chat.model_suggestions(), ["llama3"]);
    }

    #[test]
    fn test_send_guarded_on_blank_fields() {
        let mut chat = ChatSession::new();
        assert!(chat.begin_send().is_none());

        chat.set_model_input("llama3");
        chat.set_prompt("   ");
        assert!(chat.begin_send().is_none());
        assert_eq!(chat.status(), ChatStatus::Idle);

        chat.set_model_input(" ");
        chat.set_prompt("hi");
        assert!(chat.begin_send().is_none());
    }

    #[test]
    fn test_stream_accumulates_in_order() {
        let mut chat = ChatSession::new();
        chat.set_model_input(" llama3 ");
        chat.set_prompt("hi");
        let pending = chat.begin_send().unwrap();
        assert_eq!(pending.request, ChatRequest::new("llama3", "hi", true));

        let mut seen = Vec::new();
        for delta in ["Hel", "lo", ""] {
            chat.apply_chunk(pending.generation, &ChatChunk::text(delta));
            seen.push(chat.response().to_string());
        }
        chat.finish_stream(pending.generation, Ok(()));

        assert_eq!(seen, vec!["Hel", "Hello", "Hello"]);
        assert_eq!(chat.response(), "Hello");
        assert_eq!(chat.status(), ChatStatus::Ready);
    }

    #[test]
    fn test_send_resets_buffer() {
        let mut chat = ChatSession::new();
        chat.set_model_input("llama3");
        chat.set_prompt("hi");
        let first = chat.begin_send().unwrap();
        chat.apply_chunk(first.generation, &ChatChunk::text("old"));
        chat.finish_stream(first.generation, Ok(()));

        let second = chat.begin_send().unwrap();
        assert_eq!(chat.response(), "");
        assert!(!chat.apply_chunk(first.generation, &ChatChunk::text("stale")));
        chat.apply_chunk(second.generation, &ChatChunk::text("new"));
        assert_eq!(chat.response(), "new");
    }

    #[test]
    fn test_stream_error_keeps_partial_response() {
        let mut chat = ChatSession::new();
        chat.set_model_input("llama3");
        chat.set_prompt("hi");
        let pending = chat.begin_send().unwrap();
        chat.apply_chunk(pending.generation, &ChatChunk::text("partial"));
        chat.finish_stream(
            pending.generation,
            Err(StreamError::operation("connection reset")),
        );

        assert_eq!(chat.status(), ChatStatus::Error);
        assert_eq!(chat.error(), Some("OperationError: connection reset"));
        assert_eq!(chat.response(), "partial");
    }

    #[test]
    fn test_fields_locked_while_streaming() {
        let mut chat = ChatSession::new();
        chat.set_model_input("llama3");
        chat.set_prompt("hi");
        chat.begin_send().unwrap();

        assert!(!chat.set_prompt("changed"));
        assert!(!chat.set_model_input("other"));
        assert!(chat.begin_refresh().is_none());
        assert!(chat.begin_send().is_none());
        assert_eq!(chat.prompt(), "hi");
    }

    #[test]
    fn test_cycle_suggestion() {
        let mut chat = ChatSession::new();
        assert!(!chat.cycle_suggestion(true));

        let generation = chat.begin_refresh().unwrap();
        chat.finish_refresh(generation, models(&["a", "b", "c"]));
        assert_eq!(chat.model_input(), "a");

        chat.cycle_suggestion(true);
        assert_eq!(chat.model_input(), "b");
        chat.cycle_suggestion(false);
        chat.cycle_suggestion(false);
        assert_eq!(chat.model_input(), "c");
    }
}
