//! Harness Core - Headless client bindings for the Bodhi sample harness
//!
//! This crate holds everything the sample harness does that is not drawing:
//! the client seam, connection and auth state, the generic request tester
//! and the streaming chat form. A surface (the TUI today) owns a
//! [`Harness`], forwards user intents to it and renders from its views.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     Surface (TUI)                         │
//! │   intents: login / send_request / send_chat / ...         │
//! │   renders: StatusView, AuthView, ApiTester, ChatSession   │
//! └─────────────────────────────┬─────────────────────────────┘
//!                               │ poll() each frame
//! ┌─────────────────────────────┴─────────────────────────────┐
//! │                        Harness                            │
//! │  ┌──────────────┐  ┌──────────────┐  ┌─────────────────┐  │
//! │  │ClientContext │  │  ApiTester   │  │   ChatSession   │  │
//! │  └──────┬───────┘  └──────────────┘  └─────────────────┘  │
//! │         │        HarnessMessage (results, in order)       │
//! └─────────┼─────────────────────────────────────────────────┘
//!           │
//! ┌─────────┴─────────────────────────────────────────────────┐
//! │              BodhiClient (HttpClient, mocks)              │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use harness_core::{load_config, ConfigOverrides, Harness, HttpClient, ProviderConfig};
//!
//! let config = load_config(None, ConfigOverrides::from_env())?;
//! let client = Arc::new(HttpClient::from_config(&config)?);
//! let mut harness = Harness::new(client, ProviderConfig::from(&config));
//!
//! harness.refresh_state();
//! harness.chat_mut().set_prompt("hello");
//! harness.refresh_models();
//! loop {
//!     harness.poll();
//!     // render harness.status_view(), harness.chat().response(), ...
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`client`]: The `BodhiClient` seam and the HTTP reference client
//! - [`state`]: Client and server readiness
//! - [`status`]: Connection status view
//! - [`auth`]: Session identity and the login/logout action
//! - [`context`]: Shared client handle
//! - [`tester`]: Generic request tester
//! - [`chat`]: Streaming chat form
//! - [`harness`]: The orchestrator
//! - [`config`]: TOML/env configuration
//!
//! # No TUI Dependencies
//!
//! This crate has no dependency on ratatui, crossterm, or any other UI
//! framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod badge;
pub mod chat;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod harness;
pub mod messages;
pub mod state;
pub mod status;
pub mod tester;

// Re-exports for convenience
pub use auth::{AuthAction, AuthState, AuthView, UserInfo, NOT_AVAILABLE};
pub use badge::{Badge, BadgeVariant};
pub use chat::{ChatSession, ChatStatus, PendingChat};
pub use client::{
    ApiErrorResponse, ApiRequest, ApiResponse, ApiResult, BodhiClient, ChatChunk, ChatRequest,
    ChatStream, HttpClient, ModelDescriptor, ModelList, OperationError, RequestBody,
};
pub use context::{AuthLoadingGuard, ClientContext, ProviderConfig};
pub use error::{ClientError, StreamError};
pub use harness::Harness;
pub use messages::HarnessMessage;
pub use state::{ClientState, ConnectionState, SubsystemState};
pub use status::StatusView;
pub use tester::{ApiOutcome, ApiTester, RequestDraft, ResponseView, TesterStatus};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, AppConfig, ConfigError,
    ConfigOverrides,
};
