//! HTTP Client Implementation
//!
//! Reference [`BodhiClient`] talking to a Bodhi server over HTTP.
//!
//! # Bodhi API
//!
//! - `/bodhi/v1/info` - Server version and setup status
//! - `/bodhi/v1/user` - Identity claims of the bearer token
//! - `/v1/models` - Available models (OpenAI-compatible)
//! - `/v1/chat/completions` - Chat completions, streamed as SSE
//!
//! Sessions are backed by a pre-provisioned access token; this client does
//! not run an OAuth flow or refresh tokens.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::sse::{SseDecoder, SseEvent};
use super::traits::{
    ApiErrorResponse, ApiRequest, ApiResponse, ApiResult, BodhiClient, ChatChunk, ChatRequest,
    ChatStream, ModelList, RequestBody,
};
use crate::auth::{AuthState, UserInfo};
use crate::config::AppConfig;
use crate::error::{error_body_message, ClientError, StreamError};
use crate::state::{ClientState, SubsystemState};

/// Timeout for plain requests; streams are unbounded
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Channel capacity between the SSE reader task and the consumer
const STREAM_CHANNEL_CAPACITY: usize = 100;

/// Client mode label reported once the client is constructed and probed
const CLIENT_MODE: &str = "direct";

const INFO_PATH: &str = "/bodhi/v1/info";
const USER_PATH: &str = "/bodhi/v1/user";
const MODELS_PATH: &str = "/v1/models";
const CHAT_PATH: &str = "/v1/chat/completions";
const SETUP_PATH: &str = "/ui/setup/";

/// Server label when the info probe gets no response
const UNREACHABLE: &str = "unreachable";

/// Message used when a credentialed call is made without a session
const NOT_AUTHENTICATED: &str = "Not authenticated: login required";

/// Active session
#[derive(Clone, Debug)]
struct Session {
    token: String,
    user: UserInfo,
}

/// HTTP-backed Bodhi client
pub struct HttpClient {
    /// API server URL, no trailing slash
    server_url: String,
    /// Token activated by `login`
    access_token: Option<String>,
    /// Client for plain requests (with timeout)
    http_client: reqwest::Client,
    /// Client for streams (no overall timeout)
    stream_client: reqwest::Client,
    /// Last probed state
    state: RwLock<ClientState>,
    /// Current session
    session: RwLock<Option<Session>>,
}

impl HttpClient {
    /// Create a client for `server_url`
    pub fn new(
        server_url: impl Into<String>,
        access_token: Option<String>,
    ) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let stream_client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            server_url: server_url.into().trim_end_matches('/').to_string(),
            access_token,
            http_client,
            stream_client,
            state: RwLock::new(ClientState::default()),
            session: RwLock::new(None),
        })
    }

    /// Create from resolved configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(config.server_url.clone(), config.access_token.clone())
    }

    /// Absolute URL for a server path
    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.server_url, path)
        } else {
            format!("{}/{}", self.server_url, path)
        }
    }

    /// Bearer token of the active session
    fn session_token(&self) -> Option<String> {
        self.session.read().as_ref().map(|s| s.token.clone())
    }

    /// Send a prepared request and classify the outcome
    async fn dispatch(&self, builder: reqwest::RequestBuilder) -> ApiResult<Value> {
        match builder.send().await {
            Ok(response) => decode_response(response).await,
            Err(e) => {
                warn!(error = %e, "Request failed before a response was received");
                ApiResult::operation_error(e.to_string())
            }
        }
    }

    /// Probe `/bodhi/v1/info` and map it to a server sub-state
    async fn probe_server(&self) -> SubsystemState {
        match self.dispatch(self.http_client.get(self.url(INFO_PATH))).await {
            ApiResult::Success(response) => {
                let status = response
                    .body
                    .get("status")
                    .and_then(Value::as_str)
                    .unwrap_or("ready")
                    .to_string();
                if status == "ready" {
                    SubsystemState::ready(status)
                } else {
                    SubsystemState::not_ready(status)
                }
            }
            ApiResult::Error(e) => SubsystemState::not_ready(format!("error {}", e.status)),
            ApiResult::OperationError(_) => SubsystemState::not_ready(UNREACHABLE),
        }
    }
}

/// Read headers and body of a response into an [`ApiResult`]
async fn decode_response(response: reqwest::Response) -> ApiResult<Value> {
    let status = response.status().as_u16();
    let headers: BTreeMap<String, String> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => return ApiResult::operation_error(e.to_string()),
    };
    let body = decode_body(&text);

    if status >= 400 {
        ApiResult::Error(ApiErrorResponse {
            status,
            headers,
            body,
        })
    } else {
        ApiResult::Success(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

/// JSON when possible, the raw text otherwise, null when empty
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Classify one SSE payload into a chunk or a stream error
///
/// A bare string `error` becomes [`StreamError::Text`], any other `error`
/// payload keeps the whole object.
fn decode_chunk(payload: &str) -> Result<ChatChunk, StreamError> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| StreamError::Runtime(format!("invalid stream chunk: {e}")))?;
    match value.get("error") {
        Some(Value::String(text)) => return Err(StreamError::Text(text.clone())),
        Some(_) => return Err(StreamError::Object(value)),
        None => {}
    }
    serde_json::from_value(value)
        .map_err(|e| StreamError::Runtime(format!("invalid stream chunk: {e}")))
}

#[async_trait]
impl BodhiClient for HttpClient {
    fn name(&self) -> &str {
        "HttpClient"
    }

    fn client_state(&self) -> ClientState {
        self.state.read().clone()
    }

    async fn refresh_state(&self) {
        let server = self.probe_server().await;
        debug!(server = %server.label, ready = server.ready, "Server probed");
        *self.state.write() = ClientState {
            client: SubsystemState::ready(CLIENT_MODE),
            server,
        };
    }

    fn auth(&self) -> AuthState {
        match self.session.read().as_ref() {
            Some(session) => AuthState::LoggedIn(session.user.clone()),
            None => AuthState::LoggedOut,
        }
    }

    async fn login(&self) -> Result<(), ClientError> {
        let token = self.access_token.clone().ok_or_else(|| {
            ClientError::Auth("no access token configured (set BODHI_ACCESS_TOKEN)".to_string())
        })?;

        let request = self.http_client.get(self.url(USER_PATH)).bearer_auth(&token);
        let user = match self.dispatch(request).await {
            ApiResult::Success(response) => serde_json::from_value::<UserInfo>(response.body)
                .map_err(|e| ClientError::Auth(format!("unexpected user info: {e}")))?,
            ApiResult::Error(e) => {
                return Err(ClientError::Api {
                    status: e.status,
                    message: e.message().unwrap_or("login rejected").to_string(),
                })
            }
            ApiResult::OperationError(e) => return Err(ClientError::Transport(e.message)),
        };

        info!(user = ?user.preferred_username, "Logged in");
        *self.session.write() = Some(Session { token, user });
        Ok(())
    }

    async fn logout(&self) -> Result<(), ClientError> {
        if self.session.write().take().is_some() {
            info!("Logged out");
        }
        Ok(())
    }

    async fn show_setup(&self) -> Result<(), ClientError> {
        self.refresh_state().await;
        let state = self.client_state();
        if state.server.label == UNREACHABLE {
            return Err(ClientError::Setup(format!(
                "server at {} is unreachable",
                self.server_url
            )));
        }
        info!(
            url = %self.url(SETUP_PATH),
            server = %state.server.label,
            "Open the setup page to finish configuring the server"
        );
        Ok(())
    }

    async fn send_api_request(&self, request: &ApiRequest) -> ApiResult<Value> {
        let method = match reqwest::Method::from_bytes(request.method.to_uppercase().as_bytes()) {
            Ok(method) => method,
            Err(_) => {
                return ApiResult::operation_error(format!(
                    "invalid HTTP method: {}",
                    request.method
                ))
            }
        };

        let mut builder = self.http_client.request(method, self.url(&request.path));
        if request.authenticated {
            match self.session_token() {
                Some(token) => builder = builder.bearer_auth(token),
                None => return ApiResult::operation_error(NOT_AUTHENTICATED),
            }
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Text(text)) => builder
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(text.clone()),
            None => builder,
        };

        debug!(method = %request.method, path = %request.path, authenticated = request.authenticated, "Dispatching request");
        self.dispatch(builder).await
    }

    async fn fetch_models(&self) -> ApiResult<ModelList> {
        let mut builder = self.http_client.get(self.url(MODELS_PATH));
        if let Some(token) = self.session_token() {
            builder = builder.bearer_auth(token);
        }

        match self.dispatch(builder).await {
            ApiResult::Success(response) => match serde_json::from_value::<ModelList>(response.body)
            {
                Ok(models) => ApiResult::Success(ApiResponse {
                    status: response.status,
                    headers: response.headers,
                    body: models,
                }),
                Err(e) => ApiResult::operation_error(format!("invalid model list: {e}")),
            },
            ApiResult::Error(e) => ApiResult::Error(e),
            ApiResult::OperationError(e) => ApiResult::OperationError(e),
        }
    }

    async fn stream_chat(&self, request: &ChatRequest) -> Result<ChatStream, StreamError> {
        let body = serde_json::json!({
            "model": request.model,
            "messages": [{"role": "user", "content": request.prompt}],
            "stream": true,
        });

        let mut builder = self.stream_client.post(self.url(CHAT_PATH)).json(&body);
        if request.authenticated {
            match self.session_token() {
                Some(token) => builder = builder.bearer_auth(token),
                None => return Err(StreamError::operation(NOT_AUTHENTICATED)),
            }
        }

        let response = builder
            .send()
            .await
            .map_err(|e| StreamError::operation(e.to_string()))?;

        // Check for HTTP errors
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            let body = decode_body(&text);
            debug!(status, message = ?error_body_message(&body), "Chat stream rejected");
            return Err(StreamError::Api { status, body });
        }

        let mut bytes = response.bytes_stream();
        let (tx, stream) = ChatStream::channel(STREAM_CHANNEL_CAPACITY);

        // Spawn task to decode the SSE body
        tokio::spawn(async move {
            let mut decoder = SseDecoder::new();

            while let Some(chunk) = bytes.next().await {
                let events = match chunk {
                    Ok(bytes) => decoder.push(&bytes),
                    Err(e) => {
                        let _ = tx.send(Err(StreamError::operation(e.to_string()))).await;
                        return;
                    }
                };

                for event in events {
                    match event {
                        SseEvent::Done => return,
                        SseEvent::Data(payload) => {
                            let item = decode_chunk(&payload);
                            let failed = item.is_err();
                            if tx.send(item).await.is_err() || failed {
                                // Receiver dropped or stream failed, stop reading
                                return;
                            }
                        }
                    }
                }
            }

            if let Some(SseEvent::Data(payload)) = decoder.finish() {
                let _ = tx.send(decode_chunk(&payload)).await;
            }
        });

        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_joins_paths() {
        let client = HttpClient::new("http://localhost:1135/", None).unwrap();
        assert_eq!(client.url("/bodhi/v1/info"), "http://localhost:1135/bodhi/v1/info");
        assert_eq!(client.url("v1/models"), "http://localhost:1135/v1/models");
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body(r#"{"version":"1.0"}"#), json!({"version": "1.0"}));
        assert_eq!(decode_body("plain text"), json!("plain text"));
    }

    #[test]
    fn test_decode_chunk() {
        let chunk = decode_chunk(r#"{"choices":[{"delta":{"content":"Hi"}}]}"#).unwrap();
        assert_eq!(chunk.delta_text(), "Hi");

        let err = decode_chunk(r#"{"error":{"message":"overloaded"}}"#).unwrap_err();
        assert!(matches!(err, StreamError::Object(_)));

        let err = decode_chunk(r#"{"error":"model crashed"}"#).unwrap_err();
        assert_eq!(err, StreamError::Text("model crashed".to_string()));
        assert_eq!(err.user_message(), "Error: model crashed");

        let err = decode_chunk("not json").unwrap_err();
        assert!(matches!(err, StreamError::Runtime(_)));
    }

    #[test]
    fn test_initial_state() {
        let client = HttpClient::new("http://localhost:1135", None).unwrap();
        assert!(client.client_state().is_initializing());
        assert_eq!(client.auth(), AuthState::LoggedOut);
    }

    #[tokio::test]
    async fn test_login_without_token_fails() {
        let client = HttpClient::new("http://localhost:1135", None).unwrap();
        let err = client.login().await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)));
        assert_eq!(client.auth(), AuthState::LoggedOut);
    }

    #[tokio::test]
    async fn test_authenticated_request_requires_session() {
        let client = HttpClient::new("http://localhost:1135", None).unwrap();
        let request = ApiRequest::new("GET", "/bodhi/v1/user").with_authenticated(true);
        let result = client.send_api_request(&request).await;
        assert_eq!(result, ApiResult::operation_error(NOT_AUTHENTICATED));

        let chat = ChatRequest::new("llama3", "hi", true);
        let err = client.stream_chat(&chat).await.unwrap_err();
        assert_eq!(err, StreamError::operation(NOT_AUTHENTICATED));
    }

    #[tokio::test]
    async fn test_setup_fails_when_server_unreachable() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = HttpClient::new(format!("http://127.0.0.1:{port}"), None).unwrap();

        let err = client.show_setup().await.unwrap_err();
        assert!(matches!(err, ClientError::Setup(_)));
        assert_eq!(client.client_state().server.label, UNREACHABLE);
    }

    #[tokio::test]
    async fn test_invalid_method_is_operation_error() {
        let client = HttpClient::new("http://localhost:1135", None).unwrap();
        let request = ApiRequest::new("NOT A METHOD", "/bodhi/v1/info");
        let result = client.send_api_request(&request).await;
        assert!(matches!(result, ApiResult::OperationError(_)));
    }
}
