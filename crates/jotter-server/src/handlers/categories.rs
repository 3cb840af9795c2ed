//! Category handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppError, AppState};

#[derive(Serialize)]
pub struct CategoriesResponse {
    /// Categories already used, most recent first
    pub categories: Vec<String>,
    /// Vocabulary offered to the model while history is empty
    pub fallback: Vec<String>,
}

/// GET /api/categories - Category history and fallback vocabulary
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let catalog = state.db().category_catalog()?;
    Ok(Json(CategoriesResponse {
        categories: catalog.names().to_vec(),
        fallback: state.ingestor.extractor().fallback_categories().to_vec(),
    }))
}
