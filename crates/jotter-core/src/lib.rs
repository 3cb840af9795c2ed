//! Jotter Core Library
//!
//! Shared functionality for the Jotter expense tracker:
//! - Expense extraction from free text via tool-calling chat models
//! - Pluggable chat-completion backends (OpenAI-compatible, mock)
//! - Layered TOML configuration
//! - SQLite storage, reports and settings
//! - Ingestion service tying extraction to storage

pub mod ai;
pub mod categories;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod models;

/// Test utilities including a mock chat-completion server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIClient, BackendInfo, ChatBackend, MockBackend, OpenAICompatibleBackend};
pub use categories::{CategoryCatalog, COMMON_CATEGORIES};
pub use config::{Config, LlmBackendKind, LlmConfig, TelegramConfig};
pub use db::Database;
pub use error::{Error, ExtractError, Result};
pub use extract::{Extractor, FALLBACK_CURRENCY};
pub use ingest::Ingestor;
pub use models::*;
