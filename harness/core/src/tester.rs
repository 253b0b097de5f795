//! Generic Request Tester
//!
//! Builds an arbitrary request from a draft, dispatches it through the
//! client, and keeps the raw outcome for display.
//!
//! # State Machine
//!
//! ```text
//! Ready ──send──▶ Calling ──▶ Completed | Error
//!   ▲                             │
//!   └────────── clear / send ─────┘
//! ```
//!
//! Every dispatch gets a generation number. `clear()` and the next send
//! bump it, so a result that arrives for an older generation is dropped
//! instead of overwriting newer state. Nothing is cancelled.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::debug;

use crate::badge::{Badge, BadgeVariant};
use crate::client::{ApiRequest, ApiResult, BodhiClient, RequestBody};

/// Methods offered by the form
pub const METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];

/// Path the form starts with
pub const DEFAULT_PATH: &str = "/bodhi/v1/info";

/// Placeholder for an absent body
pub const NO_BODY: &str = "(no body)";

/// Tester status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TesterStatus {
    /// Nothing in flight, nothing shown
    #[default]
    Ready,
    /// Request in flight
    Calling,
    /// Response below 400 received
    Completed,
    /// Transport failure or response of 400 and above
    Error,
}

impl TesterStatus {
    /// Header badge
    #[must_use]
    pub fn badge(self) -> Badge {
        match self {
            Self::Ready => Badge::new(BadgeVariant::Secondary, "Ready"),
            Self::Calling => Badge::new(BadgeVariant::Warning, "Calling"),
            Self::Completed => Badge::new(BadgeVariant::Success, "Completed"),
            Self::Error => Badge::new(BadgeVariant::Destructive, "Error"),
        }
    }
}

/// Mutable form state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDraft {
    /// HTTP method
    pub method: String,
    /// Request path
    pub path: String,
    /// Body text, parsed leniently on send
    pub body_text: String,
    /// Send with credentials
    pub authenticated: bool,
}

impl Default for RequestDraft {
    fn default() -> Self {
        Self {
            method: METHODS[0].to_string(),
            path: DEFAULT_PATH.to_string(),
            body_text: String::new(),
            authenticated: false,
        }
    }
}

impl RequestDraft {
    /// Build the request this draft describes
    #[must_use]
    pub fn to_request(&self) -> ApiRequest {
        ApiRequest::new(self.method.clone(), self.path.clone())
            .with_body(RequestBody::parse_lenient(&self.body_text))
            .with_authenticated(self.authenticated)
    }

    /// Step through [`METHODS`] (wrapping)
    pub fn cycle_method(&mut self, forward: bool) {
        let current = METHODS
            .iter()
            .position(|m| m.eq_ignore_ascii_case(&self.method))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % METHODS.len()
        } else {
            (current + METHODS.len() - 1) % METHODS.len()
        };
        self.method = METHODS[next].to_string();
    }
}

/// Outcome of one dispatch
#[derive(Clone, Debug, PartialEq)]
pub enum ApiOutcome {
    /// Dispatched, not settled
    Pending,
    /// Response below 400
    Success {
        /// HTTP status
        status: u16,
        /// Response headers
        headers: BTreeMap<String, String>,
        /// Response body
        body: Value,
    },
    /// Response of 400 and above
    ApiError {
        /// HTTP status
        status: u16,
        /// Response headers
        headers: BTreeMap<String, String>,
        /// Error body
        body: Value,
    },
    /// No response
    OperationError {
        /// Transport failure description
        message: String,
    },
}

impl From<ApiResult<Value>> for ApiOutcome {
    fn from(result: ApiResult<Value>) -> Self {
        match result {
            // A client may report an error status as a plain response
            ApiResult::Success(r) if r.status >= 400 => Self::ApiError {
                status: r.status,
                headers: r.headers,
                body: r.body,
            },
            ApiResult::Success(r) => Self::Success {
                status: r.status,
                headers: r.headers,
                body: r.body,
            },
            ApiResult::Error(e) => Self::ApiError {
                status: e.status,
                headers: e.headers,
                body: e.body,
            },
            ApiResult::OperationError(e) => Self::OperationError { message: e.message },
        }
    }
}

/// What the response pane shows
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseView {
    /// HTTP status, 0 for transport failures
    pub status: u16,
    /// Response headers
    pub headers: BTreeMap<String, String>,
    /// Response body
    pub body: Value,
}

impl ResponseView {
    /// Body rendered for display
    #[must_use]
    pub fn formatted_body(&self) -> String {
        format_body(&self.body)
    }
}

/// Pretty-print a body (2-space JSON), or the no-body placeholder
#[must_use]
pub fn format_body(body: &Value) -> String {
    if body.is_null() {
        return NO_BODY.to_string();
    }
    serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
}

/// A dispatch handed out by [`ApiTester::begin_send`]
#[derive(Clone, Debug, PartialEq)]
pub struct PendingRequest {
    /// Generation the result must be reported under
    pub generation: u64,
    /// Request to dispatch
    pub request: ApiRequest,
}

/// Generic request tester section
#[derive(Debug, Default)]
pub struct ApiTester {
    draft: RequestDraft,
    status: TesterStatus,
    outcome: Option<ApiOutcome>,
    generation: u64,
}

impl ApiTester {
    /// Create a tester with the default draft
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Form state
    #[must_use]
    pub fn draft(&self) -> &RequestDraft {
        &self.draft
    }

    /// Mutable form state
    pub fn draft_mut(&mut self) -> &mut RequestDraft {
        &mut self.draft
    }

    /// Restore the default form
    pub fn reset_draft(&mut self) {
        self.draft = RequestDraft::default();
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> TesterStatus {
        self.status
    }

    /// Whether the send action is available
    #[must_use]
    pub fn can_send(&self) -> bool {
        self.status != TesterStatus::Calling
    }

    /// Last outcome
    #[must_use]
    pub fn outcome(&self) -> Option<&ApiOutcome> {
        self.outcome.as_ref()
    }

    /// Current generation
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Response pane content, if any
    #[must_use]
    pub fn response(&self) -> Option<ResponseView> {
        match self.outcome.as_ref()? {
            ApiOutcome::Pending => None,
            ApiOutcome::Success {
                status,
                headers,
                body,
            }
            | ApiOutcome::ApiError {
                status,
                headers,
                body,
            } => Some(ResponseView {
                status: *status,
                headers: headers.clone(),
                body: body.clone(),
            }),
            ApiOutcome::OperationError { message } => Some(ResponseView {
                status: 0,
                headers: BTreeMap::new(),
                body: json!({ "error": { "message": message } }),
            }),
        }
    }

    /// Error banner, if any
    #[must_use]
    pub fn error(&self) -> Option<String> {
        match self.outcome.as_ref()? {
            ApiOutcome::OperationError { message } => Some(format!("Network Error: {message}")),
            ApiOutcome::ApiError { status, .. } => Some(format!("Error {status}")),
            ApiOutcome::Pending | ApiOutcome::Success { .. } => None,
        }
    }

    /// Start a dispatch
    ///
    /// Returns `None` while a request is already in flight.
    pub fn begin_send(&mut self) -> Option<PendingRequest> {
        if !self.can_send() {
            return None;
        }
        self.generation += 1;
        self.status = TesterStatus::Calling;
        self.outcome = Some(ApiOutcome::Pending);

        Some(PendingRequest {
            generation: self.generation,
            request: self.draft.to_request(),
        })
    }

    /// Record the result of a dispatch
    ///
    /// Returns `false` (and changes nothing) for a superseded generation.
    pub fn finish(&mut self, generation: u64, result: ApiResult<Value>) -> bool {
        if generation != self.generation || self.status != TesterStatus::Calling {
            debug!(
                generation,
                current = self.generation,
                "Dropping stale API result"
            );
            return false;
        }

        let outcome = ApiOutcome::from(result);
        self.status = match &outcome {
            ApiOutcome::Success { .. } => TesterStatus::Completed,
            _ => TesterStatus::Error,
        };
        self.outcome = Some(outcome);
        true
    }

    /// Discard the response and error and return to `Ready`
    pub fn clear(&mut self) {
        self.generation += 1;
        self.outcome = None;
        self.status = TesterStatus::Ready;
    }

    /// Dispatch the current draft and wait for the result
    pub async fn send<C: BodhiClient + ?Sized>(&mut self, client: &C) -> bool {
        let Some(pending) = self.begin_send() else {
            return false;
        };
        let result = client.send_api_request(&pending.request).await;
        self.finish(pending.generation, result)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::client::{ApiErrorResponse, ApiResponse};

    fn success(status: u16, body: Value) -> ApiResult<Value> {
        ApiResult::Success(ApiResponse {
            status,
            headers: BTreeMap::new(),
            body,
        })
    }

    #[test]
    fn test_default_draft() {
        let tester = ApiTester::new();
        assert_eq!(tester.draft().method, "GET");
        assert_eq!(tester.draft().path, "/bodhi/v1/info");
        assert!(!tester.draft().authenticated);
        assert_eq!(tester.status(), TesterStatus::Ready);
        assert!(tester.response().is_none());
    }

    #[test]
    fn test_begin_send_refused_while_calling() {
        let mut tester = ApiTester::new();
        let pending = tester.begin_send().unwrap();
        assert_eq!(tester.status(), TesterStatus::Calling);
        assert_eq!(tester.outcome(), Some(&ApiOutcome::Pending));
        assert!(tester.begin_send().is_none());
        assert_eq!(pending.request.method, "GET");
    }

    #[test]
    fn test_success_is_completed_with_pretty_body() {
        let mut tester = ApiTester::new();
        let pending = tester.begin_send().unwrap();
        assert!(tester.finish(pending.generation, success(200, json!({"version": "1.0"}))));

        assert_eq!(tester.status(), TesterStatus::Completed);
        assert_eq!(tester.status().badge().label, "Completed");
        assert_eq!(tester.error(), None);
        let response = tester.response().unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.formatted_body(), "{\n  \"version\": \"1.0\"\n}");
    }

    #[test]
    fn test_error_status_keeps_body() {
        let mut tester = ApiTester::new();
        let pending = tester.begin_send().unwrap();
        let body = json!({"error": {"message": "not found"}});
        tester.finish(
            pending.generation,
            ApiResult::Error(ApiErrorResponse {
                status: 404,
                headers: BTreeMap::new(),
                body: body.clone(),
            }),
        );

        assert_eq!(tester.status(), TesterStatus::Error);
        assert_eq!(tester.error().as_deref(), Some("Error 404"));
        assert_eq!(tester.response().unwrap().body, body);
    }

    #[test]
    fn test_success_variant_with_error_status_is_error() {
        let mut tester = ApiTester::new();
        let pending = tester.begin_send().unwrap();
        tester.finish(pending.generation, success(500, json!("boom")));

        assert_eq!(tester.status(), TesterStatus::Error);
        assert_eq!(tester.error().as_deref(), Some("Error 500"));
        assert_eq!(tester.response().unwrap().body, json!("boom"));
    }

    #[test]
    fn test_operation_error_renders_status_zero() {
        let mut tester = ApiTester::new();
        let pending = tester.begin_send().unwrap();
        tester.finish(pending.generation, ApiResult::operation_error("connection refused"));

        assert_eq!(tester.status(), TesterStatus::Error);
        assert_eq!(
            tester.error().as_deref(),
            Some("Network Error: connection refused")
        );
        let response = tester.response().unwrap();
        assert_eq!(response.status, 0);
        assert!(response.headers.is_empty());
        assert_eq!(
            response.body,
            json!({"error": {"message": "connection refused"}})
        );
    }

    #[test]
    fn test_clear_from_any_state() {
        let mut tester = ApiTester::new();
        tester.clear();
        assert_eq!(tester.status(), TesterStatus::Ready);

        let pending = tester.begin_send().unwrap();
        tester.finish(pending.generation, ApiResult::operation_error("x"));
        tester.clear();
        assert_eq!(tester.status(), TesterStatus::Ready);
        assert!(tester.response().is_none());
        assert!(tester.error().is_none());
    }

    #[test]
    fn test_result_after_clear_is_stale() {
        let mut tester = ApiTester::new();
        let pending = tester.begin_send().unwrap();
        tester.clear();

        assert!(!tester.finish(pending.generation, success(200, json!({}))));
        assert_eq!(tester.status(), TesterStatus::Ready);
        assert!(tester.response().is_none());
    }

    #[test]
    fn test_format_body() {
        assert_eq!(format_body(&Value::Null), NO_BODY);
        assert_eq!(format_body(&json!("text")), "\"text\"");
        assert_eq!(format_body(&json!([1])), "[\n  1\n]");
    }

    #[test]
    fn test_cycle_method_wraps() {
        let mut draft = RequestDraft::default();
        draft.cycle_method(false);
        assert_eq!(draft.method, "DELETE");
        draft.cycle_method(true);
        assert_eq!(draft.method, "GET");
        draft.cycle_method(true);
        assert_eq!(draft.method, "POST");
    }

    #[test]
    fn test_draft_body_is_lenient() {
        let mut draft = RequestDraft::default();
        draft.body_text = "hello there".to_string();
        assert_eq!(
            draft.to_request().body,
            Some(RequestBody::Text("hello there".to_string()))
        );
        draft.body_text = r#"{"a": [1, 2]}"#.to_string();
        assert_eq!(
            draft.to_request().body,
            Some(RequestBody::Json(json!({"a": [1, 2]})))
        );
    }
}
