//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API with
//! tool calling:
//! - OpenAI (https://api.openai.com/v1)
//! - vLLM (http://localhost:8000/v1)
//! - LocalAI / llama-server (http://localhost:8080/v1)
//! - Ollama's compatibility layer (http://localhost:11434/v1)
//!
//! `base_url` includes the API version prefix; requests go to
//! `{base_url}/chat/completions`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::types::{ChatMessage, CompletionRequest, CompletionResponse, ToolDefinition};
use super::ChatBackend;

/// OpenAI-compatible backend
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its connection pool.
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAICompatibleBackend {
    /// Create a backend with an explicit HTTP client
    pub fn new(http_client: Client, base_url: &str, model: &str, api_key: Option<&str>) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    /// Create from the `[llm]` config section
    ///
    /// The configured timeout bounds each request end to end.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::new(
            http_client,
            &config.base_url,
            &config.model,
            config.api_key.as_deref(),
        ))
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolSpec<'a>>,
}

/// Tool entry as the API expects it
#[derive(Debug, Serialize)]
struct ToolSpec<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: &'a ToolDefinition,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_request(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: &request.messages,
            tools: request
                .tools
                .iter()
                .map(|function| ToolSpec {
                    tool_type: "function",
                    function,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAICompatibleBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let body = ChatCompletionRequest::from_request(request);
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending chat completion request"
        );

        let mut req_builder = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.bearer_auth(api_key);
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "LLM API error {}: {}",
                status, body
            )));
        }

        let completion: CompletionResponse = response.json().await?;
        debug!(choices = completion.choices.len(), "Chat completion received");
        Ok(completion)
    }

    async fn health_check(&self) -> bool {
        let mut req_builder = self.http_client.get(format!("{}/models", self.base_url));
        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.bearer_auth(api_key);
        }

        match req_builder.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(error = %e, host = %self.base_url, "LLM health check failed");
                false
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ai::types::{ChatRole, Choice};
    use crate::test_utils::MockChatServer;

    fn backend_for(url: &str, timeout: Duration) -> OpenAICompatibleBackend {
        OpenAICompatibleBackend::from_config(&LlmConfig {
            base_url: url.to_string(),
            model: "test-model".to_string(),
            api_key: Some("sk-test123".to_string()),
            timeout,
            ..LlmConfig::default()
        })
        .unwrap()
    }

    fn sample_request() -> CompletionRequest {
        CompletionRequest {
            model: "test-model".to_string(),
            messages: vec![
                ChatMessage::system("Extract expenses"),
                ChatMessage::user("Please extract all expenses from this text: lunch 20"),
            ],
            tools: vec![ToolDefinition {
                name: "categorize_expenses".to_string(),
                description: "Extract expenses".to_string(),
                parameters: serde_json::json!({"type": "object"}),
            }],
        }
    }

    #[test]
    fn test_backend_new_trims_trailing_slash() {
        let backend =
            OpenAICompatibleBackend::new(Client::new(), "http://localhost:8000/v1/", "m", None);
        assert_eq!(backend.host(), "http://localhost:8000/v1");
        assert!(backend.api_key.is_none());
    }

    #[test]
    fn test_backend_clone_with_model() {
        let backend = backend_for("http://localhost:8000/v1", Duration::from_secs(5));
        let other = backend.with_model("gpt-4o");
        assert_eq!(other.model(), "gpt-4o");
        assert_eq!(other.host(), backend.host());
        assert_eq!(other.api_key, backend.api_key);
    }

    #[test]
    fn test_request_serialization() {
        let request = sample_request();
        let json = serde_json::to_value(ChatCompletionRequest::from_request(&request)).unwrap();

        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["tools"][0]["function"]["name"], "categorize_expenses");
        assert_eq!(json["tools"][0]["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn test_request_without_tools_omits_field() {
        let mut request = sample_request();
        request.tools.clear();
        let json = serde_json::to_value(ChatCompletionRequest::from_request(&request)).unwrap();
        assert!(json.get("tools").is_none());
    }

    #[tokio::test]
    async fn test_complete_against_mock_server() {
        let server = MockChatServer::start().await;
        server.set_choices(vec![Choice::tool_call(
            "categorize_expenses",
            r#"{"transactions": []}"#,
        )]);

        let backend = backend_for(&server.url(), Duration::from_secs(5));
        let response = backend.complete(&sample_request()).await.unwrap();

        assert_eq!(response.choices.len(), 1);
        assert_eq!(
            response.choices[0].tool_calls()[0].name(),
            "categorize_expenses"
        );

        let recorded = server.requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer sk-test123"));
        assert_eq!(recorded[0].body["model"], "test-model");
        assert_eq!(recorded[0].body["tools"][0]["type"], "function");
    }

    #[tokio::test]
    async fn test_complete_error_status() {
        let server = MockChatServer::start().await;
        server.set_error(500, "upstream exploded");

        let backend = backend_for(&server.url(), Duration::from_secs(5));
        let err = backend.complete(&sample_request()).await.unwrap_err();
        match err {
            Error::InvalidData(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("upstream exploded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_times_out() {
        let server = MockChatServer::start().await;
        server.set_delay(Duration::from_millis(500));

        let backend = backend_for(&server.url(), Duration::from_millis(50));
        let err = backend.complete(&sample_request()).await.unwrap_err();
        assert!(matches!(err, Error::Http(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockChatServer::start().await;
        let backend = backend_for(&server.url(), Duration::from_secs(5));
        assert!(backend.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend = backend_for("http://127.0.0.1:9", Duration::from_secs(2));
        assert!(!backend.health_check().await);
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatRole::Assistant).unwrap();
        assert_eq!(json, "assistant");
    }
}
