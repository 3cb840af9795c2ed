//! Jotter CLI - Jot down expenses in plain words
//!
//! Usage:
//!   jotter init                      Initialize database and settings
//!   jotter add lunch 20, taxi 300    Extract and save expenses
//!   jotter list --pending            Review unconfirmed expenses
//!   jotter serve                     Start web server
//!   jotter bot                       Start Telegram bot

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::Parser;
use jotter_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag / app.debug > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose || config.app.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db_path = commands::resolve_db_path(cli.db.as_deref(), &config);

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path, &config),
        Commands::Parse { line, json } => {
            let ingestor = commands::open_ingestor(&db_path, &config)?;
            commands::cmd_parse(&ingestor, &line.join(" "), json).await
        }
        Commands::Add { line } => {
            let ingestor = commands::open_ingestor(&db_path, &config)?;
            commands::cmd_add(&ingestor, &line.join(" ")).await
        }
        Commands::List {
            limit,
            pending,
            confirmed,
            from,
            to,
        } => {
            let db = commands::open_db(&db_path)?;
            let confirm = match (pending, confirmed) {
                (true, _) => Some(false),
                (_, true) => Some(true),
                _ => None,
            };
            commands::cmd_list(&db, confirm, from, to, limit)
        }
        Commands::Confirm { id } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_confirm(&db, id)
        }
        Commands::Delete { id } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_delete(&db, id)
        }
        Commands::Categories => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_categories(&db, &config.categories.fallback)
        }
        Commands::Report { from, to, daily } => {
            let db = commands::open_db(&db_path)?;
            if daily {
                commands::cmd_report_daily(&db, from, to)
            } else {
                commands::cmd_report(&db, from, to)
            }
        }
        Commands::Settings { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                None => commands::cmd_settings_show(&db),
                Some(SettingsAction::Set { currency, timezone }) => {
                    commands::cmd_settings_set(&db, currency.as_deref(), timezone.as_deref())
                }
            }
        }
        Commands::Status => commands::cmd_status(&db_path, &config).await,
        Commands::Serve {
            address,
            static_dir,
        } => commands::cmd_serve(&db_path, &config, address.as_deref(), static_dir).await,
        Commands::Bot => commands::cmd_bot(&db_path, &config).await,
    }
}
