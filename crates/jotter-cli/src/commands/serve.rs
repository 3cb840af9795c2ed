//! Server command implementation

use std::path::{Path, PathBuf};

use anyhow::Result;
use jotter_core::Config;

use super::open_ingestor;

pub async fn cmd_serve(
    db_path: &Path,
    config: &Config,
    address: Option<&str>,
    static_dir: Option<PathBuf>,
) -> Result<()> {
    let address = address.unwrap_or(config.http.address.as_str());

    let mut server_config = jotter_server::ServerConfig::from(&config.http);
    if static_dir.is_some() {
        server_config.static_dir = static_dir;
    }

    println!("🚀 Starting Jotter web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}", address);
    if let Some(dir) = &server_config.static_dir {
        println!("   Static files: {}", dir.display());
    }
    if !server_config.allowed_origins.is_empty() {
        println!(
            "   CORS origins: {}",
            server_config.allowed_origins.join(", ")
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let ingestor = open_ingestor(db_path, config)?;

    jotter_server::serve_with_config(ingestor, address, server_config).await?;

    Ok(())
}
