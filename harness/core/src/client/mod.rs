//! Client Integration
//!
//! The [`BodhiClient`] seam every section talks through, plus a reference
//! HTTP implementation.
//!
//! # Available Clients
//!
//! - **HttpClient**: Bodhi server over HTTP with bearer-token sessions
//!
//! # Usage
//!
//! ```ignore
//! use harness_core::client::{BodhiClient, ChatRequest, HttpClient};
//!
//! let client = HttpClient::from_config(&config)?;
//! let mut stream = client.stream_chat(&ChatRequest::new("llama3", "hi", true)).await?;
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?.delta_text());
//! }
//! ```

mod http;
mod sse;
mod traits;

pub use http::HttpClient;
pub use sse::{SseDecoder, SseEvent};
pub use traits::{
    ApiErrorResponse, ApiRequest, ApiResponse, ApiResult, BodhiClient, ChatChunk, ChatRequest,
    ChatStream, ChatStreamItem, ChatStreamSender, ChunkChoice, ChunkDelta, ModelDescriptor,
    ModelList, OperationError, RequestBody,
};
