//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use jotter_core::db::Database;
use jotter_core::models::{TransactionBatch, TransactionCandidate, TransactionFilter};
use jotter_core::Config;
use tempfile::TempDir;

use crate::commands::{self, format_amount, truncate};

fn mock_config() -> Config {
    Config::from_toml(
        r#"
        [app]
        default_currency = "USD"

        [llm]
        backend = "mock"
        "#,
    )
    .unwrap()
}

fn temp_db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("jotter.db")
}

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn seed(db: &Database) -> Vec<jotter_core::Transaction> {
    let candidate = |day: u32, amount: f64, category: &str, description: &str| TransactionCandidate {
        transaction_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
        amount,
        currency: "USD".to_string(),
        category: category.to_string(),
        description: description.to_string(),
    };
    db.insert_batch(&TransactionBatch {
        transactions: vec![
            candidate(1, 12.0, "food", "lunch"),
            candidate(2, 30.0, "transport", "taxi"),
        ],
    })
    .unwrap()
}

// ========== Helpers ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer description", 10), "a longe...");
    // Multi-byte characters are not split
    assert_eq!(truncate("₹₹₹₹₹₹₹₹", 5), "₹₹...");
}

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(20.0, "INR"), "20.00 INR");
    assert_eq!(format_amount(3.456, "USD"), "3.46 USD");
}

#[test]
fn test_resolve_db_path() {
    let config = mock_config();
    assert_eq!(
        commands::resolve_db_path(None, &config),
        PathBuf::from("jotter.db")
    );
    let explicit = PathBuf::from("/tmp/other.db");
    assert_eq!(
        commands::resolve_db_path(Some(&explicit), &config),
        explicit
    );
}

// ========== Init ==========

#[test]
fn test_cmd_init_seeds_settings() {
    let dir = TempDir::new().unwrap();
    let path = temp_db_path(&dir);

    commands::cmd_init(&path, &mock_config()).unwrap();
    assert!(path.exists());

    let db = commands::open_db(&path).unwrap();
    assert_eq!(db.get_settings().unwrap().currency, "USD");
}

#[test]
fn test_cmd_init_keeps_existing_settings() {
    let dir = TempDir::new().unwrap();
    let path = temp_db_path(&dir);

    commands::cmd_init(&path, &mock_config()).unwrap();
    let db = commands::open_db(&path).unwrap();
    commands::cmd_settings_set(&db, Some("EUR"), None).unwrap();

    commands::cmd_init(&path, &mock_config()).unwrap();
    assert_eq!(db.get_settings().unwrap().currency, "EUR");
}

// ========== Parse / Add ==========

#[tokio::test]
async fn test_cmd_add_stores_expenses() {
    let dir = TempDir::new().unwrap();
    let ingestor = commands::open_ingestor(&temp_db_path(&dir), &mock_config()).unwrap();

    commands::cmd_add(&ingestor, "lunch 20, taxi 300")
        .await
        .unwrap();

    let stored = ingestor
        .db()
        .list_transactions(&TransactionFilter::default())
        .unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|t| t.currency == "USD"));
    assert!(stored.iter().all(|t| !t.confirm));
}

#[tokio::test]
async fn test_cmd_parse_does_not_store() {
    let dir = TempDir::new().unwrap();
    let ingestor = commands::open_ingestor(&temp_db_path(&dir), &mock_config()).unwrap();

    commands::cmd_parse(&ingestor, "coffee 5", false).await.unwrap();
    commands::cmd_parse(&ingestor, "coffee 5", true).await.unwrap();
    assert_eq!(ingestor.db().count_transactions().unwrap(), 0);
}

#[tokio::test]
async fn test_cmd_add_shows_model_message() {
    let dir = TempDir::new().unwrap();
    let ingestor = commands::open_ingestor(&temp_db_path(&dir), &mock_config()).unwrap();

    // The offline backend explains itself when it finds no amount
    let err = commands::cmd_add(&ingestor, "good morning")
        .await
        .unwrap_err();
    assert!(!err.to_string().is_empty());
    assert_ne!(err.to_string(), "Error parsing expenses");
    assert_eq!(ingestor.db().count_transactions().unwrap(), 0);
}

#[tokio::test]
async fn test_cmd_add_empty_line() {
    let dir = TempDir::new().unwrap();
    let ingestor = commands::open_ingestor(&temp_db_path(&dir), &mock_config()).unwrap();

    let err = commands::cmd_add(&ingestor, "   ").await.unwrap_err();
    assert_eq!(err.to_string(), "Empty input");
}

// ========== Transactions ==========

#[test]
fn test_cmd_list() {
    let db = setup_test_db();
    assert!(commands::cmd_list(&db, None, None, None, 20).is_ok());

    seed(&db);
    assert!(commands::cmd_list(&db, Some(false), None, None, 20).is_ok());
    assert!(commands::cmd_list(&db, None, NaiveDate::from_ymd_opt(2024, 6, 2), None, 0).is_ok());
}

#[test]
fn test_cmd_confirm() {
    let db = setup_test_db();
    let stored = seed(&db);

    commands::cmd_confirm(&db, stored[0].id).unwrap();
    assert!(db.get_transaction(stored[0].id).unwrap().unwrap().confirm);

    assert!(commands::cmd_confirm(&db, 9999).is_err());
}

#[test]
fn test_cmd_delete() {
    let db = setup_test_db();
    let stored = seed(&db);

    commands::cmd_delete(&db, stored[1].id).unwrap();
    assert!(db.get_transaction(stored[1].id).unwrap().is_none());

    let err = commands::cmd_delete(&db, stored[1].id).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_cmd_categories() {
    let db = setup_test_db();
    let fallback = vec!["food".to_string(), "misc".to_string()];
    assert!(commands::cmd_categories(&db, &fallback).is_ok());

    seed(&db);
    assert!(commands::cmd_categories(&db, &fallback).is_ok());
}

// ========== Reports ==========

#[test]
fn test_cmd_reports() {
    let db = setup_test_db();
    assert!(commands::cmd_report(&db, None, None).is_ok());
    assert!(commands::cmd_report_daily(&db, None, None).is_ok());

    seed(&db);
    let from = NaiveDate::from_ymd_opt(2024, 6, 1);
    let to = NaiveDate::from_ymd_opt(2024, 6, 30);
    assert!(commands::cmd_report(&db, from, to).is_ok());
    assert!(commands::cmd_report_daily(&db, from, to).is_ok());
}

// ========== Settings ==========

#[test]
fn test_cmd_settings() {
    let db = setup_test_db();
    assert!(commands::cmd_settings_show(&db).is_ok());

    commands::cmd_settings_set(&db, Some("gbp"), None).unwrap();
    let settings = db.get_settings().unwrap();
    assert_eq!(settings.currency, "GBP");
    assert_eq!(settings.timezone, "UTC");

    commands::cmd_settings_set(&db, None, Some("Europe/London")).unwrap();
    let settings = db.get_settings().unwrap();
    assert_eq!(settings.currency, "GBP");
    assert_eq!(settings.timezone, "Europe/London");
}

#[test]
fn test_cmd_settings_set_validation() {
    let db = setup_test_db();
    assert!(commands::cmd_settings_set(&db, None, None).is_err());
    assert!(commands::cmd_settings_set(&db, Some("pounds"), None).is_err());
}

// ========== Status ==========

#[tokio::test]
async fn test_cmd_status() {
    let dir = TempDir::new().unwrap();
    let path = temp_db_path(&dir);
    let config = mock_config();

    // Works before and after init
    assert!(commands::cmd_status(&path, &config).await.is_ok());
    commands::cmd_init(&path, &config).unwrap();
    assert!(commands::cmd_status(&path, &config).await.is_ok());
}

// ========== Bot ==========

#[tokio::test]
async fn test_cmd_bot_requires_token() {
    let dir = TempDir::new().unwrap();
    let path = temp_db_path(&dir);

    let err = commands::cmd_bot(&path, &mock_config()).await.unwrap_err();
    assert!(err.to_string().contains("Telegram token"));
    // Nothing is opened before the token check
    assert!(!path.exists());
}
