//! Pluggable chat-completion backend abstraction
//!
//! # Architecture
//!
//! - `ChatBackend` trait: one tool-enabled chat completion per call
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::load(None)?;
//! let ai = AIClient::from_config(&config.llm)?;
//! let response = ai.complete(&request).await?;
//! ```

mod mock;
mod openai_compatible;
pub mod types;

pub use mock::{MockBackend, MockReply};
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use async_trait::async_trait;

use crate::config::{LlmBackendKind, LlmConfig};
use crate::error::Result;

/// Trait defining the interface for all chat-completion backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Run one chat completion and return every choice the provider sent
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI-compatible backend (OpenAI, vLLM, LocalAI, llama-server, Ollama's /v1, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for development and tests
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from the `[llm]` config section
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        match config.backend {
            LlmBackendKind::OpenAICompatible => Ok(AIClient::OpenAICompatible(
                OpenAICompatibleBackend::from_config(config)?,
            )),
            LlmBackendKind::Mock => Ok(AIClient::Mock(MockBackend::new())),
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }

    /// Backend configuration for status displays
    pub fn info(&self) -> BackendInfo {
        let kind = match self {
            AIClient::OpenAICompatible(_) => LlmBackendKind::OpenAICompatible.as_str(),
            AIClient::Mock(_) => LlmBackendKind::Mock.as_str(),
        };
        BackendInfo {
            kind,
            host: self.host().to_string(),
            model: self.model().to_string(),
        }
    }
}

// Implement ChatBackend for AIClient by delegating to the inner backend
#[async_trait]
impl ChatBackend for AIClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        match self {
            AIClient::OpenAICompatible(b) => b.complete(request).await,
            AIClient::Mock(b) => b.complete(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
