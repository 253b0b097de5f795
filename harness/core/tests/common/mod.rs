//! Scripted client shared by the integration tests

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;

use harness_core::client::ChatStreamItem;
use harness_core::{
    ApiRequest, ApiResponse, ApiResult, AuthState, BodhiClient, ChatChunk, ChatRequest,
    ChatStream, ClientError, ClientState, Harness, ModelDescriptor, ModelList, ProviderConfig,
    StreamError, SubsystemState, UserInfo,
};

/// One scripted chat stream
pub enum ChatScript {
    /// `stream_chat` itself fails
    OpenFails(StreamError),
    /// Items yielded in order, then end of stream
    Items(Vec<ChatStreamItem>),
}

/// Client whose every answer is queued up front
#[derive(Default)]
pub struct ScriptedClient {
    pub state: Mutex<ClientState>,
    pub auth: Mutex<AuthState>,
    pub login_error: Mutex<Option<ClientError>>,
    pub user: Mutex<Option<UserInfo>>,
    pub api_results: Mutex<VecDeque<ApiResult<Value>>>,
    pub model_results: Mutex<VecDeque<ApiResult<ModelList>>>,
    pub chat_scripts: Mutex<VecDeque<ChatScript>>,
    pub requests: Mutex<Vec<ApiRequest>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    /// When set, `send_api_request` waits for a permit before answering
    pub api_gate: Option<Arc<Notify>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            api_gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn push_api(&self, result: ApiResult<Value>) {
        self.api_results.lock().push_back(result);
    }

    pub fn push_models(&self, result: ApiResult<ModelList>) {
        self.model_results.lock().push_back(result);
    }

    pub fn push_chat(&self, script: ChatScript) {
        self.chat_scripts.lock().push_back(script);
    }
}

#[async_trait]
impl BodhiClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    fn client_state(&self) -> ClientState {
        self.state.lock().clone()
    }

    async fn refresh_state(&self) {
        *self.state.lock() = ClientState {
            client: SubsystemState::ready("direct"),
            server: SubsystemState::ready("ready"),
        };
    }

    fn auth(&self) -> AuthState {
        self.auth.lock().clone()
    }

    async fn login(&self) -> Result<(), ClientError> {
        if let Some(error) = self.login_error.lock().take() {
            return Err(error);
        }
        let user = self.user.lock().clone().unwrap_or_default();
        *self.auth.lock() = AuthState::LoggedIn(user);
        Ok(())
    }

    async fn logout(&self) -> Result<(), ClientError> {
        *self.auth.lock() = AuthState::LoggedOut;
        Ok(())
    }

    async fn show_setup(&self) -> Result<(), ClientError> {
        Err(ClientError::Setup("no setup flow in tests".to_string()))
    }

    async fn send_api_request(&self, request: &ApiRequest) -> ApiResult<Value> {
        self.requests.lock().push(request.clone());
        if let Some(gate) = &self.api_gate {
            gate.notified().await;
        }
        let next = self.api_results.lock().pop_front();
        next.unwrap_or_else(|| ApiResult::operation_error("no scripted response"))
    }

    async fn fetch_models(&self) -> ApiResult<ModelList> {
        let next = self.model_results.lock().pop_front();
        next.unwrap_or_else(|| ApiResult::operation_error("no scripted models"))
    }

    async fn stream_chat(&self, request: &ChatRequest) -> Result<ChatStream, StreamError> {
        self.chat_requests.lock().push(request.clone());
        let script = self.chat_scripts.lock().pop_front();
        match script {
            Some(ChatScript::OpenFails(e)) => Err(e),
            Some(ChatScript::Items(items)) => {
                let (tx, stream) = ChatStream::channel(16);
                tokio::spawn(async move {
                    for item in items {
                        if tx.send(item).await.is_err() {
                            break;
                        }
                    }
                });
                Ok(stream)
            }
            None => Err(StreamError::Unknown),
        }
    }
}

pub fn harness(client: ScriptedClient) -> (Arc<ScriptedClient>, Harness<ScriptedClient>) {
    let client = Arc::new(client);
    let harness = Harness::new(Arc::clone(&client), ProviderConfig::default());
    (client, harness)
}

/// Apply the next harness message, failing the test if none arrives
pub async fn step(harness: &mut Harness<ScriptedClient>) {
    let applied = tokio::time::timeout(Duration::from_secs(2), harness.process_next())
        .await
        .expect("timed out waiting for a harness message");
    assert!(applied, "harness channel closed");
}

pub fn ok<T>(status: u16, body: T) -> ApiResult<T> {
    ApiResult::Success(ApiResponse {
        status,
        headers: BTreeMap::new(),
        body,
    })
}

pub fn models(ids: &[&str]) -> ModelList {
    ModelList {
        data: ids
            .iter()
            .map(|id| ModelDescriptor { id: (*id).to_string() })
            .collect(),
    }
}

pub fn chunks(deltas: &[&str]) -> Vec<ChatStreamItem> {
    deltas.iter().map(|d| Ok(ChatChunk::text(*d))).collect()
}
