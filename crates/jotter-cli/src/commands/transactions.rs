//! Transaction command implementations

use anyhow::{bail, Result};
use chrono::NaiveDate;
use jotter_core::db::Database;
use jotter_core::models::TransactionFilter;

use super::{format_amount, truncate};

pub fn cmd_list(
    db: &Database,
    confirm: Option<bool>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: i64,
) -> Result<()> {
    let filter = TransactionFilter {
        confirm,
        from,
        to,
        limit: Some(limit.max(1)),
        offset: None,
    };
    let transactions = db.list_transactions(&filter)?;

    if transactions.is_empty() {
        println!("No transactions found. Add some with:");
        println!("  jotter add lunch 20, taxi 300");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let mark = if tx.confirm { "✓" } else { " " };
        println!(
            "   {} [{}] {} │ {:>14} │ {:<14} │ {}",
            mark,
            tx.id,
            tx.transaction_date,
            format_amount(tx.amount, &tx.currency),
            truncate(&tx.category, 14),
            truncate(&tx.description, 30)
        );
    }

    Ok(())
}

pub fn cmd_confirm(db: &Database, id: i64) -> Result<()> {
    if !db.confirm_transaction(id)? {
        bail!("Transaction {} not found", id);
    }
    println!("✅ Confirmed transaction {}", id);
    Ok(())
}

pub fn cmd_delete(db: &Database, id: i64) -> Result<()> {
    // Fetch first so the summary can be shown
    let Some(tx) = db.get_transaction(id)? else {
        bail!("Transaction {} not found", id);
    };

    db.delete_transaction(id)?;

    println!("🗑️  Deleted transaction {}:", id);
    println!(
        "   {} │ {} │ {}",
        tx.transaction_date,
        format_amount(tx.amount, &tx.currency),
        truncate(&tx.description, 40)
    );

    Ok(())
}

pub fn cmd_categories(db: &Database, fallback: &[String]) -> Result<()> {
    let catalog = db.category_catalog()?;

    println!();
    if catalog.is_empty() {
        println!("🏷️  No categories used yet. New expenses will be guided by:");
        println!("   {}", fallback.join(", "));
        return Ok(());
    }

    println!("🏷️  Categories ({}), most recently used first", catalog.len());
    println!("   ─────────────────────────────");
    for name in catalog.names() {
        println!("   {}", name);
    }

    Ok(())
}
