//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::parse_date_param;
use crate::{AppError, AppState, MAX_PAGE_LIMIT};
use jotter_core::models::{Transaction, TransactionBatch, TransactionFilter, TransactionUpdate};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    /// Only reviewed (true) or pending (false) rows
    pub confirm: Option<bool>,
    /// Custom start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// Custom end date (YYYY-MM-DD)
    pub to: Option<String>,
}

fn default_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub transactions: Vec<Transaction>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Body of the ingest and preview endpoints
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    pub line: String,
}

/// GET /api/transactions - List transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<TransactionResponse>, AppError> {
    // Input validation: clamp pagination parameters
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let filter = TransactionFilter {
        confirm: params.confirm,
        from: parse_date_param(params.from.as_deref(), "from")?,
        to: parse_date_param(params.to.as_deref(), "to")?,
        limit: Some(limit),
        offset: Some(offset),
    };

    let transactions = state.db().list_transactions(&filter)?;
    // Stats ignore limit/offset, so this is the unpaged count
    let total = state.db().dashboard_stats(&filter)?.transaction_count;

    Ok(Json(TransactionResponse {
        transactions,
        total,
        limit,
        offset,
    }))
}

/// POST /api/transactions - Extract expenses from a line and store them
pub async fn ingest_line(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LineRequest>,
) -> Result<(StatusCode, Json<Vec<Transaction>>), AppError> {
    let stored = state.ingestor.ingest(&body.line).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// POST /api/transactions/preview - Extract expenses without storing them
pub async fn preview_line(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LineRequest>,
) -> Result<Json<TransactionBatch>, AppError> {
    let batch = state.ingestor.preview(&body.line).await?;
    Ok(Json(batch))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state
        .db()
        .get_transaction(id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    Ok(Json(transaction))
}

/// PUT /api/transactions/:id - Edit a transaction
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<TransactionUpdate>,
) -> Result<Json<Transaction>, AppError> {
    if update.amount < 0.0 {
        return Err(AppError::bad_request("Amount must not be negative"));
    }
    let updated = state.db().update_transaction(id, &update)?;
    Ok(Json(updated))
}

/// POST /api/transactions/:id/confirm - Mark a transaction as reviewed
pub async fn confirm_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    if !state.db().confirm_transaction(id)? {
        return Err(AppError::not_found("Transaction not found"));
    }
    let transaction = state
        .db()
        .get_transaction(id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    Ok(Json(transaction))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.db().delete_transaction(id)? {
        return Err(AppError::not_found("Transaction not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
