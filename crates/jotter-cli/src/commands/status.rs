//! Status command implementation

use std::path::Path;

use anyhow::Result;
use jotter_core::{AIClient, ChatBackend, Config};

use super::open_db;

pub async fn cmd_status(db_path: &Path, config: &Config) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Jotter Status");
    println!("   ─────────────────────────────────────────────────────────────");

    match &config.source {
        Some(path) => println!("   Config: {}", path.display()),
        None => println!("   Config: (built-in defaults)"),
    }

    // Database path
    println!("   Database: {}", db_path.display());

    // Check if database file exists and get size
    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }

        match open_db(db_path) {
            Ok(db) => {
                if let Ok(count) = db.count_transactions() {
                    println!("   Transactions: {}", count);
                }
                if let Ok(catalog) = db.category_catalog() {
                    println!("   Categories: {}", catalog.len());
                }
                if let Ok(settings) = db.get_settings() {
                    println!("   Currency: {}", settings.currency);
                }
            }
            Err(e) => {
                println!("   ❌ Error opening database: {}", e);
            }
        }
    } else {
        println!("   Size: (database not initialized, run 'jotter init')");
    }

    // AI backend
    println!();
    match AIClient::from_config(&config.llm) {
        Ok(client) => {
            let info = client.info();
            println!("   AI backend: {} ({})", info.kind, info.host);
            println!("   Model: {}", info.model);
            if client.health_check().await {
                println!("   ✅ Reachable");
            } else {
                println!("   ❌ Not responding");
            }
        }
        Err(e) => println!("   ❌ AI backend misconfigured: {}", e),
    }

    println!();
    Ok(())
}
