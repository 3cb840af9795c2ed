//! Line parsing commands (parse, add)

use anyhow::{anyhow, Result};
use jotter_core::{Error, Ingestor};

use super::{format_amount, truncate};

/// Turn extraction failures into the message meant for the user
///
/// The full detail was already logged by the extractor.
fn explain(err: Error) -> anyhow::Error {
    match err {
        Error::Extract(e) => anyhow!(e.user_message()),
        other => other.into(),
    }
}

/// Show what a line would be saved as
pub async fn cmd_parse(ingestor: &Ingestor, line: &str, json: bool) -> Result<()> {
    let batch = ingestor.preview(line).await.map_err(explain)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    println!();
    println!("🔍 Parsed {} expense(s) (not saved)", batch.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for c in batch.iter() {
        println!(
            "   {} │ {:>14} │ {:<14} │ {}",
            c.transaction_date,
            format_amount(c.amount, &c.currency),
            truncate(&c.category, 14),
            truncate(&c.description, 30)
        );
    }

    Ok(())
}

/// Extract expenses from a line and save them
pub async fn cmd_add(ingestor: &Ingestor, line: &str) -> Result<()> {
    let stored = ingestor.ingest(line).await.map_err(explain)?;

    println!();
    println!("✅ Saved {} expense(s)", stored.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for tx in &stored {
        println!(
            "   [{}] {} │ {:>14} │ {:<14} │ {}",
            tx.id,
            tx.transaction_date,
            format_amount(tx.amount, &tx.currency),
            truncate(&tx.category, 14),
            truncate(&tx.description, 30)
        );
    }
    println!();
    println!("   Review with 'jotter list --pending', then 'jotter confirm <id>'.");

    Ok(())
}
