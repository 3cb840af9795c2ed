//! Settings handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{AppError, AppState};
use jotter_core::models::Settings;

/// GET /api/settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Settings>, AppError> {
    Ok(Json(state.db().get_settings()?))
}

/// PUT /api/settings - Replace currency and timezone
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, AppError> {
    let saved = state.db().update_settings(&settings)?;
    Ok(Json(saved))
}
