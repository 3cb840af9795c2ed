//! Bot reply tests

use super::*;
use chrono::NaiveDate;
use jotter_core::ai::{AIClient, Choice, MockBackend};
use jotter_core::db::Database;
use jotter_core::extract::{Extractor, TOOL_NAME};
use jotter_core::models::TransactionFilter;

fn setup_state(allowed: &[&str]) -> (BotState, MockBackend) {
    let db = Database::in_memory().unwrap();
    let mock = MockBackend::new();
    let extractor = Extractor::new(AIClient::Mock(mock.clone()), vec!["misc".into()])
        .with_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let telegram = TelegramConfig {
        token: None,
        allowed_users: allowed.iter().map(|u| u.to_string()).collect(),
    };
    (
        BotState::new(Ingestor::new(db, extractor, "INR"), telegram),
        mock,
    )
}

fn alice() -> Sender {
    Sender {
        id: 1001,
        username: Some("alice".into()),
    }
}

fn stored_count(state: &BotState) -> usize {
    state
        .ingestor
        .db()
        .list_transactions(&TransactionFilter::default())
        .unwrap()
        .len()
}

// ========== Command parsing ==========

#[test]
fn test_parse_commands() {
    assert_eq!(Command::parse("/start"), Some(Command::Start));
    assert_eq!(
        Command::parse("/track lunch 20, taxi 300 "),
        Some(Command::Track("lunch 20, taxi 300".into()))
    );
    assert_eq!(Command::parse("/track"), Some(Command::Track(String::new())));
    assert_eq!(
        Command::parse("/track@jotter_bot coffee 5"),
        Some(Command::Track("coffee 5".into()))
    );
    assert_eq!(Command::parse("/TRACK x"), Some(Command::Track("x".into())));
    assert_eq!(
        Command::parse("/help"),
        Some(Command::Unknown("help".into()))
    );
}

#[test]
fn test_plain_text_is_not_a_command() {
    assert_eq!(Command::parse("lunch 20"), None);
    assert_eq!(Command::parse("/"), None);
    assert_eq!(Command::parse(""), None);
}

// ========== Authorization ==========

#[tokio::test]
async fn test_unauthorized_user_refused() {
    let (state, mock) = setup_state(&["alice"]);
    let mallory = Sender {
        id: 666,
        username: Some("mallory".into()),
    };

    let reply = state.reply_to(&mallory, "/track lunch 20").await;
    assert_eq!(reply.as_deref(), Some(UNAUTHORIZED));
    assert!(mock.last_request().is_none());
    assert_eq!(stored_count(&state), 0);
}

#[tokio::test]
async fn test_empty_allow_list_refuses_everyone() {
    let (state, _mock) = setup_state(&[]);
    let reply = state.reply_to(&alice(), "/start").await;
    assert_eq!(reply.as_deref(), Some(UNAUTHORIZED));
}

#[tokio::test]
async fn test_user_allowed_by_id() {
    let (state, _mock) = setup_state(&["1001"]);
    let anonymous = Sender {
        id: 1001,
        username: None,
    };
    let reply = state.reply_to(&anonymous, "/start").await;
    assert_eq!(reply.as_deref(), Some(GREETING));
}

#[tokio::test]
async fn test_plain_text_ignored() {
    let (state, mock) = setup_state(&["alice"]);
    assert!(state.reply_to(&alice(), "lunch 20").await.is_none());
    assert!(mock.last_request().is_none());
}

// ========== Commands ==========

#[tokio::test]
async fn test_start_greets() {
    let (state, _mock) = setup_state(&["alice"]);
    let reply = state.reply_to(&alice(), "/start").await;
    assert_eq!(reply.as_deref(), Some(GREETING));
}

#[tokio::test]
async fn test_unknown_command() {
    let (state, _mock) = setup_state(&["alice"]);
    let reply = state.reply_to(&alice(), "/report").await;
    assert_eq!(reply.as_deref(), Some(UNKNOWN_COMMAND));
}

#[tokio::test]
async fn test_track_without_arguments() {
    let (state, mock) = setup_state(&["alice"]);
    let reply = state.reply_to(&alice(), "/track   ").await;
    assert_eq!(reply.as_deref(), Some(TRACK_USAGE));
    assert!(mock.last_request().is_none());
}

#[tokio::test]
async fn test_track_stores_expenses() {
    let (state, mock) = setup_state(&["alice"]);
    mock.push_choices(vec![Choice::tool_call(
        TOOL_NAME,
        r#"{"transactions":[
            {"transaction_date":"","amount":20,"currency":"","category":"food","description":"lunch"},
            {"transaction_date":"2024-05-31","amount":300,"currency":"","category":"transport","description":"taxi"}
        ]}"#,
    )]);

    let reply = state
        .reply_to(&alice(), "/track lunch 20, taxi 300 yesterday")
        .await
        .unwrap();

    assert!(reply.starts_with("Saved 2 expense(s):"));
    assert!(reply.contains("20.00 INR lunch (food, 2024-06-01)"));
    assert!(reply.contains("300.00 INR taxi (transport, 2024-05-31)"));
    assert_eq!(stored_count(&state), 2);

    let request = mock.last_request().unwrap();
    assert!(request.messages[1]
        .content
        .ends_with("lunch 20, taxi 300 yesterday"));
}

#[tokio::test]
async fn test_track_relays_model_message() {
    let (state, mock) = setup_state(&["alice"]);
    mock.push_choices(vec![Choice::text("That doesn't look like an expense.", "stop")]);

    let reply = state.reply_to(&alice(), "/track good morning").await;
    assert_eq!(reply.as_deref(), Some("That doesn't look like an expense."));
    assert_eq!(stored_count(&state), 0);
}

#[tokio::test]
async fn test_track_backend_failure_is_generic() {
    let (state, mock) = setup_state(&["alice"]);
    mock.push_failure("upstream exploded");

    let reply = state.reply_to(&alice(), "/track lunch 20").await.unwrap();
    assert_eq!(reply, "Error parsing expenses");
    assert!(!reply.contains("upstream"));
    assert_eq!(stored_count(&state), 0);
}

#[tokio::test]
async fn test_run_requires_token() {
    let (state, _mock) = setup_state(&["alice"]);
    let err = run(state.ingestor.clone(), state.telegram.clone())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("telegram.token"));
}
