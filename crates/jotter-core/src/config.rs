//! Application configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded in layers:
//! 1. Explicit path (e.g. `--config`), which must exist
//! 2. User override in the config dir (`~/.config/jotter/config.toml`)
//! 3. Embedded defaults (compiled into binary)
//!
//! Environment variables (`JOTTER_*`) are applied on top of whichever file won.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::categories::common_categories;
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/jotter.toml");

/// Which chat-completion backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackendKind {
    /// Any server implementing the OpenAI chat completions API
    OpenAICompatible,
    /// Offline heuristic backend
    Mock,
}

impl LlmBackendKind {
    /// Parse a backend name, falling back to `OpenAICompatible` for unknown names
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" | "ollama" => {
                Self::OpenAICompatible
            }
            "mock" => Self::Mock,
            other => {
                warn!(backend = %other, "Unknown LLM backend, falling back to openai_compatible");
                Self::OpenAICompatible
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAICompatible => "openai_compatible",
            Self::Mock => "mock",
        }
    }
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Currency used when settings do not provide one
    pub default_currency: String,
    pub db_path: PathBuf,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_currency: "INR".to_string(),
            db_path: PathBuf::from("jotter.db"),
            debug: false,
        }
    }
}

/// Chat-completion provider settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackendKind,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackendKind::OpenAICompatible,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// REST server settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub address: String,
    pub timeout: Duration,
    pub static_dir: Option<PathBuf>,
    pub allowed_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:7777".to_string(),
            timeout: Duration::from_secs(90),
            static_dir: None,
            allowed_origins: vec![],
        }
    }
}

/// Category vocabulary settings
#[derive(Debug, Clone)]
pub struct CategoryConfig {
    /// Guidance vocabulary for users without category history
    pub fallback: Vec<String>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            fallback: common_categories(),
        }
    }
}

/// Telegram bot settings
#[derive(Debug, Clone, Default)]
pub struct TelegramConfig {
    /// Bot API token; the bot refuses to start without one
    pub token: Option<String>,
    /// Usernames (without `@`) or numeric user IDs allowed to talk to the bot
    pub allowed_users: Vec<String>,
}

impl TelegramConfig {
    /// Whether a sender is on the allow-list
    ///
    /// An empty list admits nobody.
    pub fn is_allowed(&self, user_id: u64, username: Option<&str>) -> bool {
        let id = user_id.to_string();
        let username = username.map(|u| u.trim_start_matches('@'));
        self.allowed_users
            .iter()
            .any(|entry| *entry == id || Some(entry.as_str()) == username)
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub app: AppConfig,
    pub llm: LlmConfig,
    pub http: HttpConfig,
    pub categories: CategoryConfig,
    pub telegram: TelegramConfig,
    /// File the config was read from, `None` for embedded defaults
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load config from the standard locations and apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = load_file(explicit)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse config from TOML content over the built-in defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Apply `JOTTER_*` overrides using the given variable lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(backend) = get("JOTTER_LLM_BACKEND") {
            self.llm.backend = LlmBackendKind::parse(&backend);
        }
        if let Some(base_url) = get("JOTTER_LLM_BASE_URL") {
            self.llm.base_url = base_url;
        }
        if let Some(model) = get("JOTTER_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(api_key) = get("JOTTER_LLM_API_KEY") {
            self.llm.api_key = Some(api_key);
        }
        if let Some(timeout) = get("JOTTER_LLM_TIMEOUT_SECS") {
            match timeout.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.llm.timeout = Duration::from_secs(secs),
                _ => warn!(value = %timeout, "Ignoring invalid JOTTER_LLM_TIMEOUT_SECS"),
            }
        }
        if let Some(currency) = get("JOTTER_DEFAULT_CURRENCY") {
            self.app.default_currency = currency.trim().to_uppercase();
        }
        if let Some(db_path) = get("JOTTER_DB_PATH") {
            self.app.db_path = PathBuf::from(db_path);
        }
        if let Some(address) = get("JOTTER_HTTP_ADDRESS") {
            self.http.address = address;
        }
        if let Some(token) = get("JOTTER_TELEGRAM_TOKEN") {
            self.telegram.token = Some(token);
        }
        if let Some(users) = get("JOTTER_TELEGRAM_ALLOWED_USERS") {
            self.telegram.allowed_users = split_user_list(&users);
        }
    }
}

/// Split a comma-separated allow-list, dropping blanks and leading `@`
fn split_user_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|u| u.trim().trim_start_matches('@'))
        .filter(|u| !u.is_empty())
        .map(String::from)
        .collect()
}

/// Default user config path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jotter").join("config.toml"))
}

/// Read the winning config file (explicit, then user override, then embedded)
fn load_file(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return read_config(path);
    }

    if let Some(path) = default_config_path() {
        if path.exists() {
            return read_config(&path);
        }
    }

    parse_config(DEFAULT_CONFIG)
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    let mut config = parse_config(&content)?;
    config.source = Some(path.to_path_buf());
    Ok(config)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    app: Option<RawApp>,
    llm: Option<RawLlm>,
    http: Option<RawHttp>,
    categories: Option<RawCategories>,
    telegram: Option<RawTelegram>,
}

#[derive(Debug, Deserialize)]
struct RawApp {
    default_currency: Option<String>,
    db_path: Option<PathBuf>,
    debug: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawLlm {
    backend: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawHttp {
    address: Option<String>,
    timeout_secs: Option<u64>,
    static_dir: Option<PathBuf>,
    allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawCategories {
    fallback: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawTelegram {
    token: Option<String>,
    allowed_users: Option<Vec<String>>,
}

fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)?;

    let mut config = Config::default();

    if let Some(app) = raw.app {
        if let Some(currency) = app.default_currency {
            config.app.default_currency = currency.trim().to_uppercase();
        }
        if let Some(db_path) = app.db_path {
            config.app.db_path = db_path;
        }
        if let Some(debug) = app.debug {
            config.app.debug = debug;
        }
    }

    if let Some(llm) = raw.llm {
        if let Some(backend) = llm.backend {
            config.llm.backend = LlmBackendKind::parse(&backend);
        }
        if let Some(base_url) = llm.base_url {
            config.llm.base_url = base_url;
        }
        if let Some(model) = llm.model {
            config.llm.model = model;
        }
        config.llm.api_key = llm.api_key.filter(|k| !k.trim().is_empty());
        if let Some(timeout) = llm.timeout_secs {
            if timeout == 0 {
                return Err(Error::Config("llm.timeout_secs must be positive".into()));
            }
            config.llm.timeout = Duration::from_secs(timeout);
        }
    }

    if let Some(http) = raw.http {
        if let Some(address) = http.address {
            config.http.address = address;
        }
        if let Some(timeout) = http.timeout_secs {
            if timeout == 0 {
                return Err(Error::Config("http.timeout_secs must be positive".into()));
            }
            config.http.timeout = Duration::from_secs(timeout);
        }
        config.http.static_dir = http.static_dir;
        if let Some(origins) = http.allowed_origins {
            config.http.allowed_origins = origins;
        }
    }

    if let Some(categories) = raw.categories {
        if let Some(fallback) = categories.fallback {
            config.categories.fallback = fallback;
        }
    }

    if let Some(telegram) = raw.telegram {
        config.telegram.token = telegram.token.filter(|t| !t.trim().is_empty());
        if let Some(users) = telegram.allowed_users {
            config.telegram.allowed_users = split_user_list(&users.join(","));
        }
    }

    Ok(config)
}
