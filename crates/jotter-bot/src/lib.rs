//! Jotter Telegram Bot
//!
//! Long-polling bot that feeds chat messages into the extraction core.
//!
//! - `/start` greets the user
//! - `/track <line>` extracts the expenses in `<line>` and stores them
//! - Only senders on the `[telegram] allowed_users` list get answers

use std::sync::Arc;

use anyhow::{bail, Context};
use teloxide::prelude::*;
use tracing::{error, info, warn};

use jotter_core::{Error as CoreError, Ingestor, TelegramConfig, Transaction};

pub const GREETING: &str = "Hello! I am a bot that can help you track your expenses. \
Use the /track command to start tracking your expenses.";
pub const UNAUTHORIZED: &str = "You are not authorized to use this bot.";
pub const UNKNOWN_COMMAND: &str =
    "Unknown command. Please use the /start command to get started.";
pub const TRACK_USAGE: &str =
    "Please provide the expenses in the format: /track <amount> <description>";
pub const SAVE_FAILED: &str = "Error saving transactions. Please try again.";

/// Who sent a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: u64,
    pub username: Option<String>,
}

/// A recognised bot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    /// Everything after `/track`, trimmed
    Track(String),
    Unknown(String),
}

impl Command {
    /// Parse a `/command[@botname] args` message; `None` for plain text
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim_start();
        let rest = text.strip_prefix('/')?;
        let (head, args) = match rest.find(char::is_whitespace) {
            Some(i) => (&rest[..i], rest[i..].trim()),
            None => (rest, ""),
        };
        // Group chats address commands as /track@jotter_bot
        let name = head.split('@').next().unwrap_or(head);
        if name.is_empty() {
            return None;
        }

        Some(match name.to_lowercase().as_str() {
            "start" => Self::Start,
            "track" => Self::Track(args.to_string()),
            other => Self::Unknown(other.to_string()),
        })
    }
}

/// Shared bot state
pub struct BotState {
    pub ingestor: Ingestor,
    pub telegram: TelegramConfig,
}

impl BotState {
    pub fn new(ingestor: Ingestor, telegram: TelegramConfig) -> Self {
        Self { ingestor, telegram }
    }

    /// Compute the reply for one incoming message
    ///
    /// Plain text (no leading `/`) is ignored and yields `None`.
    pub async fn reply_to(&self, sender: &Sender, text: &str) -> Option<String> {
        let command = Command::parse(text)?;

        if !self
            .telegram
            .is_allowed(sender.id, sender.username.as_deref())
        {
            warn!(user_id = sender.id, username = ?sender.username, "Unauthorized user");
            return Some(UNAUTHORIZED.to_string());
        }

        let reply = match command {
            Command::Start => GREETING.to_string(),
            Command::Track(line) => self.track(sender, &line).await,
            Command::Unknown(name) => {
                info!(command = %name, "Unknown command");
                UNKNOWN_COMMAND.to_string()
            }
        };
        Some(reply)
    }

    async fn track(&self, sender: &Sender, line: &str) -> String {
        if line.is_empty() {
            return TRACK_USAGE.to_string();
        }

        info!(user_id = sender.id, line = %line, "Received track command");
        match self.ingestor.ingest(line).await {
            Ok(stored) => format_saved(&stored),
            Err(CoreError::Extract(e)) => e.user_message(),
            Err(e) => {
                error!(error = %e, "Error saving transactions");
                SAVE_FAILED.to_string()
            }
        }
    }
}

/// Summary of stored rows, one per line
pub fn format_saved(stored: &[Transaction]) -> String {
    let mut reply = format!("Saved {} expense(s):", stored.len());
    for tx in stored {
        reply.push_str(&format!(
            "\n• {:.2} {} {} ({}, {})",
            tx.amount, tx.currency, tx.description, tx.category, tx.transaction_date
        ));
    }
    reply
}

/// Poll Telegram for updates until Ctrl+C
pub async fn run(ingestor: Ingestor, telegram: TelegramConfig) -> anyhow::Result<()> {
    let Some(token) = telegram.token.clone() else {
        bail!("telegram.token is not set (or set JOTTER_TELEGRAM_TOKEN)");
    };
    if telegram.allowed_users.is_empty() {
        warn!("telegram.allowed_users is empty; every sender will be refused");
    }

    let bot = Bot::new(token);
    let me = bot
        .get_me()
        .await
        .context("Failed to reach Telegram (check the bot token)")?;
    info!(bot_name = %me.username(), "Telegram bot started polling updates");

    let state = Arc::new(BotState::new(ingestor, telegram));
    let handler = Update::filter_message().endpoint(answer);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Stopping Telegram bot updates");
    Ok(())
}

async fn answer(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let (Some(text), Some(user)) = (msg.text(), msg.from.as_ref()) else {
        return Ok(());
    };
    let sender = Sender {
        id: user.id.0,
        username: user.username.clone(),
    };

    if let Some(reply) = state.reply_to(&sender, text).await {
        bot.send_message(msg.chat.id, reply).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
