//! Error types for Jotter

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of a single expense extraction
///
/// Only `NoValidTransaction` carries text meant for the end user. Everything
/// else is logged in full and shown as a generic message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// The raw line was empty; no request was made
    #[error("empty input")]
    EmptyInput,

    /// The provider call failed, timed out, was cancelled, or did not return exactly one choice
    #[error("error completing the request: {0}")]
    CompletionFailure(String),

    /// A matching tool call was found but its arguments did not decode
    #[error("error decoding tool arguments: {0}")]
    DecodeFailure(String),

    /// The model replied in prose that the input holds no expense
    #[error("{0}")]
    NoValidTransaction(String),

    /// No matching tool call and no explanation from the model
    #[error("no valid transactions found in response")]
    UnclassifiedFailure,
}

impl ExtractError {
    /// Short machine-readable name, used in logs and API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::CompletionFailure(_) => "completion_failure",
            Self::DecodeFailure(_) => "decode_failure",
            Self::NoValidTransaction(_) => "no_valid_transaction",
            Self::UnclassifiedFailure => "unclassified_failure",
        }
    }

    /// Message that is safe to show to the person who typed the line
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInput => "Empty input".to_string(),
            Self::NoValidTransaction(message) => message.clone(),
            _ => "Error parsing expenses".to_string(),
        }
    }
}
