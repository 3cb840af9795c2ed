//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `resolve_db_path` - Pick the database path from flags and config
//! - `open_db` - Shared utility to open the database
//! - `open_ingestor` - Database plus extractor, ready to take lines
//! - `cmd_init` - Initialize the database

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jotter_core::{db::Database, Config, Extractor, Ingestor};
use tracing::debug;

/// `--db` wins over `app.db_path`
pub fn resolve_db_path(cli_db: Option<&Path>, config: &Config) -> PathBuf {
    cli_db
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.app.db_path.clone())
}

/// Open the database, running migrations
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Open the database and build the extractor from config
pub fn open_ingestor(db_path: &Path, config: &Config) -> Result<Ingestor> {
    let db = open_db(db_path)?;
    db.seed_settings(&config.app.default_currency)
        .context("Failed to seed settings")?;
    let extractor = Extractor::from_config(config).context("Failed to set up AI backend")?;
    let info = extractor.client().info();
    debug!(backend = info.kind, host = %info.host, model = %info.model, "AI backend ready");
    Ok(Ingestor::new(db, extractor, &config.app.default_currency))
}

pub fn cmd_init(db_path: &Path, config: &Config) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    db.seed_settings(&config.app.default_currency)
        .context("Failed to seed settings")?;
    let settings = db.get_settings()?;
    println!("   Default currency: {}", settings.currency);
    println!("   Timezone: {}", settings.timezone);

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add expenses: jotter add lunch 20, taxi 300");
    println!("  2. Start web UI: jotter serve");

    Ok(())
}
