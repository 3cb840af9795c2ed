//! Report command implementations

use anyhow::Result;
use chrono::NaiveDate;
use jotter_core::db::Database;
use jotter_core::models::TransactionFilter;

fn range_filter(from: Option<NaiveDate>, to: Option<NaiveDate>) -> TransactionFilter {
    TransactionFilter {
        from,
        to,
        ..Default::default()
    }
}

fn range_label(from: Option<NaiveDate>, to: Option<NaiveDate>) -> String {
    match (from, to) {
        (None, None) => "all time".to_string(),
        (Some(f), None) => format!("since {}", f),
        (None, Some(t)) => format!("until {}", t),
        (Some(f), Some(t)) => format!("{} to {}", f, t),
    }
}

/// Spending per category
pub fn cmd_report(db: &Database, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let filter = range_filter(from, to);
    let stats = db.dashboard_stats(&filter)?;
    let summary = db.category_summary(&filter)?;

    println!();
    println!("📊 Spending by Category ({})", range_label(from, to));
    println!("   ─────────────────────────────────────────");

    if summary.is_empty() {
        println!("   No expenses in this period.");
        return Ok(());
    }

    for row in &summary {
        let pct = if stats.total_expenses > 0.0 {
            row.total_spent / stats.total_expenses * 100.0
        } else {
            0.0
        };
        println!(
            "   {:<20} {:>12.2}  ({:>5.1}%)",
            row.category, row.total_spent, pct
        );
    }
    println!("   ─────────────────────────────────────────");
    println!("   {:<20} {:>12.2}", "Total", stats.total_expenses);
    println!(
        "   {} transactions in {} categories",
        stats.transaction_count, stats.category_count
    );

    Ok(())
}

/// Spending per day
pub fn cmd_report_daily(
    db: &Database,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let daily = db.daily_spending(&range_filter(from, to))?;

    println!();
    println!("📅 Daily Spending ({})", range_label(from, to));
    println!("   ─────────────────────────────");

    if daily.is_empty() {
        println!("   No expenses in this period.");
        return Ok(());
    }

    for day in &daily {
        println!("   {} │ {:>12.2}", day.transaction_date, day.total_spent);
    }

    Ok(())
}
