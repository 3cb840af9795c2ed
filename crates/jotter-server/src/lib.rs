//! Jotter Web Server
//!
//! Axum-based REST API for the Jotter expense tracker.
//!
//! - Line ingestion and preview through the extraction core
//! - Transaction review (list, edit, confirm, delete)
//! - Spending reports and user settings
//! - Restrictive CORS policy, request timeout, sanitized error responses

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use jotter_core::config::HttpConfig;
use jotter_core::db::Database;
use jotter_core::{ChatBackend, Error as CoreError, ExtractError, Ingestor};

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Upper bound for a whole request, extraction included
    pub request_timeout: Duration,
    /// Built front-end served for non-API paths
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

impl From<&HttpConfig> for ServerConfig {
    fn from(http: &HttpConfig) -> Self {
        Self {
            allowed_origins: http.allowed_origins.clone(),
            request_timeout: http.timeout,
            static_dir: http.static_dir.clone(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub ingestor: Ingestor,
    pub config: ServerConfig,
}

impl AppState {
    pub fn db(&self) -> &Database {
        self.ingestor.db()
    }
}

/// Create the application router
pub fn create_router(ingestor: Ingestor, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        ingestor,
        config: config.clone(),
    });

    let api_routes = Router::new()
        // Health
        .route("/health", get(handlers::health))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::ingest_line),
        )
        .route("/transactions/preview", post(handlers::preview_line))
        .route(
            "/transactions/:id",
            get(handlers::get_transaction)
                .put(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        )
        .route(
            "/transactions/:id/confirm",
            post(handlers::confirm_transaction),
        )
        // Categories
        .route("/categories", get(handlers::list_categories))
        // Reports
        .route("/reports/categories", get(handlers::category_report))
        .route("/reports/daily", get(handlers::daily_report))
        .route("/reports/dashboard", get(handlers::dashboard_report))
        // Settings
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        );

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    // Serve static files if directory provided
    if let Some(dir) = config.static_dir.as_ref() {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve_with_config(
    ingestor: Ingestor,
    address: &str,
    config: ServerConfig,
) -> anyhow::Result<()> {
    check_ai_connection(&ingestor).await;

    if let Some(dir) = config.static_dir.as_ref() {
        if !dir.exists() {
            warn!(dir = %dir.display(), "Static directory does not exist");
        }
    }

    let app = create_router(ingestor, config);

    info!("Starting server at http://{}", address);

    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection(ingestor: &Ingestor) {
    let client = ingestor.extractor().client();
    let info = client.info();
    if client.health_check().await {
        info!(
            "AI backend connected: {} {} (model: {})",
            info.kind, info.host, info.model
        );
    } else {
        warn!(
            "AI backend configured but not responding: {} {} (model: {})",
            info.kind, info.host, info.model
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    /// Extraction failure kind, when the error came from the extractor
    kind: Option<&'static str>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            kind: None,
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            kind: None,
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            kind: None,
            internal: None,
        }
    }

    fn extraction(err: &ExtractError) -> Self {
        let status = match err {
            ExtractError::EmptyInput | ExtractError::NoValidTransaction(_) => {
                StatusCode::BAD_REQUEST
            }
            ExtractError::CompletionFailure(_)
            | ExtractError::DecodeFailure(_)
            | ExtractError::UnclassifiedFailure => {
                error!(kind = err.kind(), error = %err, "Expense extraction failed");
                StatusCode::BAD_GATEWAY
            }
        };
        Self {
            status,
            message: err.user_message(),
            kind: Some(err.kind()),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let mut body = serde_json::json!({
            "error": self.message
        });
        if let Some(kind) = self.kind {
            body["kind"] = serde_json::json!(kind);
        }

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        let mapped = match err.downcast_ref::<CoreError>() {
            Some(CoreError::Extract(e)) => Some(Self::extraction(e)),
            Some(CoreError::NotFound(what)) => {
                Some(Self::not_found(&format!("Not found: {}", what)))
            }
            Some(CoreError::InvalidData(msg)) => Some(Self::bad_request(msg)),
            _ => None,
        };

        mapped.unwrap_or_else(|| Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            kind: None,
            // Keep full error for logging
            internal: Some(err),
        })
    }
}
