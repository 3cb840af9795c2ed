//! Test utilities for jotter-core
//!
//! This module provides a mock OpenAI-compatible chat-completion server that
//! can be used for development and integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::ai::{ChatMessage, Choice, CompletionRequest, CompletionResponse, MockBackend};

/// A request received by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Value of the `Authorization` header, if any
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Debug, Clone)]
enum Reply {
    /// Answer like `MockBackend` would
    Heuristic,
    Choices(Vec<Choice>),
    Error(u16, String),
}

struct ServerState {
    reply: Mutex<Reply>,
    delay: Mutex<Option<Duration>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Mock chat-completion server for testing and development
///
/// Serves `POST /v1/chat/completions` and `GET /v1/models` on an ephemeral port.
pub struct MockChatServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockChatServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = Arc::new(ServerState {
            reply: Mutex::new(Reply::Heuristic),
            delay: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL including the API version prefix
    pub fn url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Reply to every chat request with these choices
    pub fn set_choices(&self, choices: Vec<Choice>) {
        *self.state.reply.lock().unwrap() = Reply::Choices(choices);
    }

    /// Reply to every chat request with an error status and plain-text body
    pub fn set_error(&self, status: u16, body: &str) {
        *self.state.reply.lock().unwrap() = Reply::Error(status, body.to_string());
    }

    /// Wait this long before answering chat requests
    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = Some(delay);
    }

    /// Chat requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockChatServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Models endpoint (health check)
async fn handle_models() -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "mock-model", "object": "model", "owned_by": "jotter"}]
    }))
}

/// Subset of the chat request the heuristic needs
#[derive(Deserialize)]
struct WireRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(default)]
    tools: Vec<WireTool>,
}

#[derive(Deserialize)]
struct WireTool {
    function: crate::ai::ToolDefinition,
}

async fn handle_chat(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(RecordedRequest {
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });

    let delay = *state.delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let reply = state.reply.lock().unwrap().clone();
    let response = match reply {
        Reply::Error(status, message) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, Json(json!(message)));
        }
        Reply::Choices(choices) => CompletionResponse { choices },
        Reply::Heuristic => match serde_json::from_value::<WireRequest>(body) {
            Ok(wire) => MockBackend::heuristic_response(&CompletionRequest {
                model: wire.model,
                messages: wire.messages,
                tools: wire.tools.into_iter().map(|t| t.function).collect(),
            }),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": {"message": e.to_string()}})),
                )
            }
        },
    };

    let mut value = serde_json::to_value(response).unwrap();
    value["object"] = json!("chat.completion");
    value["model"] = json!("mock-model");
    (StatusCode::OK, Json(value))
}
