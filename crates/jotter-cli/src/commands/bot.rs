//! Telegram bot command implementation

use std::path::Path;

use anyhow::{bail, Result};
use jotter_core::Config;

use super::open_ingestor;

pub async fn cmd_bot(db_path: &Path, config: &Config) -> Result<()> {
    if config.telegram.token.is_none() {
        bail!("No Telegram token configured. Set telegram.token or JOTTER_TELEGRAM_TOKEN");
    }

    println!("🤖 Starting Jotter Telegram bot...");
    println!("   Database: {}", db_path.display());
    if config.telegram.allowed_users.is_empty() {
        println!("   ⚠️  telegram.allowed_users is empty, nobody can use the bot");
    } else {
        println!(
            "   Allowed users: {}",
            config.telegram.allowed_users.join(", ")
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let ingestor = open_ingestor(db_path, config)?;

    jotter_bot::run(ingestor, config.telegram.clone()).await
}
