//! Key/value user settings

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::Database;
use crate::error::{Error, Result};
use crate::extract::FALLBACK_CURRENCY;
use crate::models::Settings;

pub const DEFAULT_TIMEZONE: &str = "UTC";

const CURRENCY_KEY: &str = "currency";
const TIMEZONE_KEY: &str = "timezone";

/// Normalize a currency code, rejecting anything but three ASCII letters
pub fn validate_currency(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_uppercase())
    } else {
        Err(Error::InvalidData(format!(
            "Invalid currency code '{}': expected three letters like USD",
            code
        )))
    }
}

impl Database {
    /// Read a single setting
    pub fn setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Stored currency, if the user has set one
    pub fn currency_setting(&self) -> Result<Option<String>> {
        Ok(self.setting(CURRENCY_KEY)?.filter(|c| !c.trim().is_empty()))
    }

    /// Current settings, with defaults for anything unset
    pub fn get_settings(&self) -> Result<Settings> {
        Ok(Settings {
            currency: self
                .currency_setting()?
                .unwrap_or_else(|| FALLBACK_CURRENCY.to_string()),
            timezone: self
                .setting(TIMEZONE_KEY)?
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        })
    }

    /// Replace all settings
    pub fn update_settings(&self, settings: &Settings) -> Result<Settings> {
        let currency = validate_currency(&settings.currency)?;
        let timezone = settings.timezone.trim();
        if timezone.is_empty() {
            return Err(Error::InvalidData("Timezone must not be empty".into()));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for (key, value) in [(CURRENCY_KEY, currency.as_str()), (TIMEZONE_KEY, timezone)] {
            tx.execute(
                "INSERT INTO settings (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
        }
        tx.commit()?;

        info!(currency = %currency, timezone = %timezone, "Settings updated");
        Ok(Settings {
            currency,
            timezone: timezone.to_string(),
        })
    }

    /// Store defaults for settings that are not set yet
    pub fn seed_settings(&self, default_currency: &str) -> Result<()> {
        let currency =
            validate_currency(default_currency).unwrap_or_else(|_| FALLBACK_CURRENCY.to_string());
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?), (?, ?)",
            params![CURRENCY_KEY, currency, TIMEZONE_KEY, DEFAULT_TIMEZONE],
        )?;
        Ok(())
    }
}
