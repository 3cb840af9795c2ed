//! Expense extraction
//!
//! Turns one free-text line into a [`TransactionBatch`] using a tool-calling
//! chat model:
//!
//! 1. [`prompts`] builds the system and user messages
//! 2. [`schema`] describes the `categorize_expenses` tool
//! 3. the configured [`AIClient`] runs the completion
//! 4. [`interpret`] reads the single choice
//! 5. [`normalize`] fills in dates and currencies
//!
//! The extractor holds no per-call state and is cheap to clone.

pub mod interpret;
pub mod normalize;
pub mod prompts;
pub mod schema;

use std::future::Future;

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info};

use crate::ai::{AIClient, ChatBackend, ChatMessage, CompletionRequest};
use crate::categories::CategoryCatalog;
use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::models::TransactionBatch;

pub use interpret::{interpret, select_choice};
pub use normalize::Normalizer;
pub use prompts::{build_prompts, Prompts, FALLBACK_CURRENCY};
pub use schema::{expense_tool, TOOL_NAME};

/// Expense extractor over a chat backend
#[derive(Clone)]
pub struct Extractor {
    client: AIClient,
    fallback_categories: Vec<String>,
    /// Fixed "today", used instead of the local date when set
    today: Option<NaiveDate>,
}

impl Extractor {
    pub fn new(client: AIClient, fallback_categories: Vec<String>) -> Self {
        Self {
            client,
            fallback_categories,
            today: None,
        }
    }

    /// Build the client and fallback vocabulary from config
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = AIClient::from_config(&config.llm)?;
        Ok(Self::new(client, config.categories.fallback.clone()))
    }

    /// Pin the date used for defaults and prompts
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn client(&self) -> &AIClient {
        &self.client
    }

    pub fn fallback_categories(&self) -> &[String] {
        &self.fallback_categories
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Build the completion request for a line without sending it
    pub fn request_for(
        &self,
        raw_line: &str,
        default_currency: &str,
        catalog: &CategoryCatalog,
    ) -> CompletionRequest {
        let Prompts { system, user } = build_prompts(
            raw_line,
            default_currency,
            catalog,
            &self.fallback_categories,
            self.today(),
        );

        CompletionRequest {
            model: self.client.model().to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            tools: vec![expense_tool(catalog, &self.fallback_categories)],
        }
    }

    /// Extract every expense in `raw_line`
    ///
    /// Makes exactly one completion call and never retries. Dropping the
    /// returned future aborts the in-flight request.
    pub async fn parse(
        &self,
        raw_line: &str,
        default_currency: &str,
        catalog: &CategoryCatalog,
    ) -> std::result::Result<TransactionBatch, ExtractError> {
        if raw_line.trim().is_empty() {
            return Err(ExtractError::EmptyInput);
        }

        debug!(
            line = %raw_line,
            categories = catalog.len(),
            "Parsing expenses"
        );

        let today = self.today();
        let request = self.request_for(raw_line, default_currency, catalog);

        let response = self.client.complete(&request).await.map_err(|e| {
            error!(error = %e, host = %self.client.host(), "Completion error");
            ExtractError::CompletionFailure(e.to_string())
        })?;

        let choice = select_choice(response).inspect_err(|e| {
            error!(error = %e, "Completion error");
        })?;

        let extracted = interpret(&choice).inspect_err(|e| match e {
            ExtractError::NoValidTransaction(message) => {
                info!(message = %message, "Model found no expense in input")
            }
            other => error!(kind = other.kind(), error = %other, "Failed to interpret reply"),
        })?;

        let batch = Normalizer::new(default_currency, today).normalize(extracted);
        debug!(count = batch.len(), "Parsed expenses");
        Ok(batch)
    }

    /// Like [`parse`](Self::parse), but gives up when `cancel` completes first
    pub async fn parse_until<F>(
        &self,
        raw_line: &str,
        default_currency: &str,
        catalog: &CategoryCatalog,
        cancel: F,
    ) -> std::result::Result<TransactionBatch, ExtractError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                info!("Expense extraction cancelled");
                Err(ExtractError::CompletionFailure("request cancelled".to_string()))
            }
            result = self.parse(raw_line, default_currency, catalog) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ai::{Choice, MockBackend};
    use crate::categories::common_categories;
    use crate::config::LlmConfig;
    use crate::test_utils::MockChatServer;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn extractor_with(mock: &MockBackend) -> Extractor {
        Extractor::new(AIClient::Mock(mock.clone()), common_categories()).with_today(today())
    }

    fn lunch_call() -> Choice {
        Choice::tool_call(
            TOOL_NAME,
            r#"{"transactions":[{"transaction_date":"","amount":20,"currency":"","category":"food","description":"lunch"}]}"#,
        )
    }

    #[tokio::test]
    async fn test_parse_lunch_scenario() {
        let mock = MockBackend::new();
        mock.push_choices(vec![lunch_call()]);
        let extractor = extractor_with(&mock);

        let batch = extractor
            .parse("lunch 20", "INR", &CategoryCatalog::new())
            .await
            .unwrap();

        assert_eq!(batch.len(), 1);
        let c = &batch.transactions[0];
        assert_eq!(c.transaction_date, today());
        assert_eq!(c.amount, 20.0);
        assert_eq!(c.currency, "INR");
        assert_eq!(c.category, "food");
        assert_eq!(c.description, "lunch");
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_request() {
        let mock = MockBackend::new();
        let extractor = extractor_with(&mock);

        let err = extractor
            .parse("   ", "INR", &CategoryCatalog::new())
            .await
            .unwrap_err();
        assert_eq!(err, ExtractError::EmptyInput);
        assert!(mock.last_request().is_none());
    }

    #[tokio::test]
    async fn test_request_shape() {
        let mock = MockBackend::new();
        mock.push_choices(vec![lunch_call()]);
        let extractor = extractor_with(&mock);
        let catalog: CategoryCatalog = ["food", "transport"].into_iter().collect();

        extractor.parse("lunch 20", "USD", &catalog).await.unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.model, "mock");
        assert_eq!(request.messages.len(), 2);
        assert!(request.messages[0].content.contains("food, transport"));
        assert!(request.messages[0].content.contains("2024-06-01"));
        assert_eq!(
            request.messages[1].content,
            "Please extract all expenses from this text: lunch 20"
        );
        assert_eq!(request.tools.len(), 1);
        assert_eq!(request.tools[0].name, TOOL_NAME);
    }

    #[tokio::test]
    async fn test_lowercase_default_currency_in_request() {
        let mock = MockBackend::new();
        mock.push_choices(vec![lunch_call()]);
        let extractor = extractor_with(&mock);

        let batch = extractor
            .parse("lunch 20", "usd", &CategoryCatalog::new())
            .await
            .unwrap();

        let request = mock.last_request().unwrap();
        assert!(request.messages[0]
            .content
            .contains("Your default currency is USD"));
        assert_eq!(batch.transactions[0].currency, "USD");
    }

    #[tokio::test]
    async fn test_no_valid_transaction_message() {
        let mock = MockBackend::new();
        mock.push_choices(vec![Choice::text("That doesn't look like an expense.", "stop")]);
        let extractor = extractor_with(&mock);

        let err = extractor
            .parse("hello", "INR", &CategoryCatalog::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ExtractError::NoValidTransaction("That doesn't look like an expense.".into())
        );
        assert_eq!(err.user_message(), "That doesn't look like an expense.");
    }

    #[tokio::test]
    async fn test_two_choices_is_completion_failure() {
        let mock = MockBackend::new();
        mock.push_choices(vec![lunch_call(), lunch_call()]);
        let extractor = extractor_with(&mock);

        let err = extractor
            .parse("lunch 20", "INR", &CategoryCatalog::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::CompletionFailure(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_completion_failure() {
        let mock = MockBackend::new();
        mock.push_failure("connection reset");
        let extractor = extractor_with(&mock);

        let err = extractor
            .parse("lunch 20", "INR", &CategoryCatalog::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::CompletionFailure(ref d) if d.contains("connection reset")));
        assert_eq!(err.user_message(), "Error parsing expenses");
    }

    #[tokio::test]
    async fn test_parse_until_cancelled() {
        let server = MockChatServer::start().await;
        server.set_delay(Duration::from_secs(5));
        let client = AIClient::from_config(&LlmConfig {
            base_url: server.url(),
            ..LlmConfig::default()
        })
        .unwrap();
        let extractor = Extractor::new(client, vec![]).with_today(today());

        let err = extractor
            .parse_until(
                "lunch 20",
                "INR",
                &CategoryCatalog::new(),
                tokio::time::sleep(Duration::from_millis(50)),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ExtractError::CompletionFailure("request cancelled".into())
        );
    }

    #[tokio::test]
    async fn test_parse_until_completes() {
        let mock = MockBackend::new();
        mock.push_choices(vec![lunch_call()]);
        let extractor = extractor_with(&mock);

        let batch = extractor
            .parse_until(
                "lunch 20",
                "INR",
                &CategoryCatalog::new(),
                std::future::pending::<()>(),
            )
            .await
            .unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[tokio::test]
    async fn test_parse_over_http_times_out() {
        let server = MockChatServer::start().await;
        server.set_delay(Duration::from_millis(500));
        let client = AIClient::from_config(&LlmConfig {
            base_url: server.url(),
            timeout: Duration::from_millis(50),
            ..LlmConfig::default()
        })
        .unwrap();
        let extractor = Extractor::new(client, vec![]).with_today(today());

        let err = extractor
            .parse("lunch 20", "INR", &CategoryCatalog::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::CompletionFailure(_)));
    }

    #[tokio::test]
    async fn test_parse_over_http_heuristic() {
        let server = MockChatServer::start().await;
        let client = AIClient::from_config(&LlmConfig {
            base_url: server.url(),
            ..LlmConfig::default()
        })
        .unwrap();
        let extractor = Extractor::new(client, common_categories()).with_today(today());

        let batch = extractor
            .parse("coffee $4", "INR", &CategoryCatalog::new())
            .await
            .unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.transactions[0].currency, "USD");
        assert_eq!(batch.transactions[0].transaction_date, today());
    }
}
