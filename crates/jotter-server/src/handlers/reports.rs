//! Report handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::parse_date_param;
use crate::{AppError, AppState};
use jotter_core::models::{CategorySummary, DailySpending, DashboardStats, TransactionFilter};

/// Query parameters shared by all reports
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Only reviewed (true) or pending (false) rows
    pub confirm: Option<bool>,
}

impl ReportQuery {
    fn filter(&self) -> Result<TransactionFilter, AppError> {
        Ok(TransactionFilter {
            confirm: self.confirm,
            from: parse_date_param(self.from.as_deref(), "from")?,
            to: parse_date_param(self.to.as_deref(), "to")?,
            ..Default::default()
        })
    }
}

/// GET /api/reports/categories - Total spend per category
pub async fn category_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<Vec<CategorySummary>>, AppError> {
    let summary = state.db().category_summary(&params.filter()?)?;
    Ok(Json(summary))
}

/// GET /api/reports/daily - Total spend per day
pub async fn daily_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<Vec<DailySpending>>, AppError> {
    let daily = state.db().daily_spending(&params.filter()?)?;
    Ok(Json(daily))
}

/// GET /api/reports/dashboard - Headline totals
pub async fn dashboard_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = state.db().dashboard_stats(&params.filter()?)?;
    Ok(Json(stats))
}
