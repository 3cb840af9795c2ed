//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use jotter_core::ChatBackend;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ai: AiStatus,
}

#[derive(Serialize)]
pub struct AiStatus {
    pub backend: &'static str,
    pub host: String,
    pub model: String,
    pub available: bool,
}

/// GET /api/health - Server liveness and AI backend status
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let client = state.ingestor.extractor().client();
    let info = client.info();
    let available = client.health_check().await;

    Json(HealthResponse {
        status: "ok",
        ai: AiStatus {
            backend: info.kind,
            host: info.host,
            model: info.model,
            available,
        },
    })
}
