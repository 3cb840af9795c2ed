//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Jotter - Jot down expenses in plain words
#[derive(Parser)]
#[command(name = "jotter")]
#[command(about = "Turn free-text notes into categorized expenses", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the user config dir, then built-in defaults)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database path (overrides app.db_path)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and default settings
    Init,

    /// Extract expenses from a line without saving them
    Parse {
        /// The line to parse, e.g. "lunch 20, taxi 300"
        #[arg(required = true, num_args = 1..)]
        line: Vec<String>,

        /// Print the parsed batch as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract expenses from a line and save them
    Add {
        /// The line to parse, e.g. "lunch 20, taxi 300"
        #[arg(required = true, num_args = 1..)]
        line: Vec<String>,
    },

    /// List saved transactions, newest first
    List {
        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Only transactions not yet confirmed
        #[arg(long, conflicts_with = "confirmed")]
        pending: bool,

        /// Only confirmed transactions
        #[arg(long)]
        confirmed: bool,

        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Mark a transaction as reviewed
    Confirm {
        /// Transaction ID
        id: i64,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },

    /// Show categories used so far
    Categories,

    /// Spending report
    Report {
        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Show per-day totals instead of per-category
        #[arg(long)]
        daily: bool,
    },

    /// Show or change user settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Show config, database and AI backend status
    Status,

    /// Start the web server
    Serve {
        /// Address to bind to (overrides http.address)
        #[arg(short, long)]
        address: Option<String>,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Run the Telegram bot (/start, /track <line>)
    Bot,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Change the default currency or timezone
    Set {
        /// ISO 4217 currency code, e.g. USD
        #[arg(long)]
        currency: Option<String>,

        /// IANA timezone name, e.g. Asia/Kolkata
        #[arg(long)]
        timezone: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_joins_words() {
        let cli = Cli::parse_from(["jotter", "add", "lunch", "20,", "taxi", "300"]);
        match cli.command {
            Commands::Add { line } => assert_eq!(line.join(" "), "lunch 20, taxi 300"),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["jotter", "list", "--db", "/tmp/x.db", "--pending"]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        match cli.command {
            Commands::List { pending, limit, .. } => {
                assert!(pending);
                assert_eq!(limit, 20);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_report_dates_parse() {
        let cli = Cli::parse_from(["jotter", "report", "--from", "2024-06-01", "--daily"]);
        match cli.command {
            Commands::Report { from, to, daily } => {
                assert_eq!(from, NaiveDate::from_ymd_opt(2024, 6, 1));
                assert!(to.is_none());
                assert!(daily);
            }
            _ => panic!("expected report"),
        }
    }

    #[test]
    fn test_bot_command() {
        let cli = Cli::parse_from(["jotter", "bot", "--config", "/tmp/jotter.toml"]);
        assert!(matches!(cli.command, Commands::Bot));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/jotter.toml")));
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(Cli::try_parse_from(["jotter", "list", "--from", "June"]).is_err());
    }

    #[test]
    fn test_pending_conflicts_with_confirmed() {
        assert!(Cli::try_parse_from(["jotter", "list", "--pending", "--confirmed"]).is_err());
    }
}
