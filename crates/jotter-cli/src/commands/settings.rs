//! Settings command implementations

use anyhow::{bail, Result};
use jotter_core::db::Database;
use jotter_core::models::Settings;

pub fn cmd_settings_show(db: &Database) -> Result<()> {
    let settings = db.get_settings()?;

    println!();
    println!("⚙️  Settings");
    println!("   Currency: {}", settings.currency);
    println!("   Timezone: {}", settings.timezone);

    Ok(())
}

pub fn cmd_settings_set(
    db: &Database,
    currency: Option<&str>,
    timezone: Option<&str>,
) -> Result<()> {
    if currency.is_none() && timezone.is_none() {
        bail!("Nothing to change. Pass --currency and/or --timezone");
    }

    let current = db.get_settings()?;
    let saved = db.update_settings(&Settings {
        currency: currency.map(str::to_string).unwrap_or(current.currency),
        timezone: timezone.map(str::to_string).unwrap_or(current.timezone),
    })?;

    println!("✅ Settings updated");
    println!("   Currency: {}", saved.currency);
    println!("   Timezone: {}", saved.timezone);

    Ok(())
}
