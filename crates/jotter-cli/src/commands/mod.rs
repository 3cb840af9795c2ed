//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `bot` - Telegram bot command
//! - `core` - Init and shared utilities (open_db, open_ingestor)
//! - `expenses` - Parse and add lines through the extractor
//! - `reports` - Category and daily spending reports
//! - `serve` - Web server command
//! - `settings` - Show and change user settings
//! - `status` - Config, database and AI backend status
//! - `transactions` - Transaction commands (list, confirm, delete, categories)

pub mod bot;
pub mod core;
pub mod expenses;
pub mod reports;
pub mod serve;
pub mod settings;
pub mod status;
pub mod transactions;

// Re-export command functions for main.rs
pub use bot::*;
pub use core::*;
pub use expenses::*;
pub use reports::*;
pub use serve::*;
pub use settings::*;
pub use status::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount with its currency code
pub fn format_amount(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}
