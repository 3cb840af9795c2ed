//! Mock backend for testing
//!
//! Without a script it behaves like a tiny offline extractor: it splits the
//! input line into segments, picks out amounts and currency cues, and maps a
//! handful of keywords to categories. Tests can script exact replies or
//! failures and inspect the last request.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::error::{Error, Result};

use super::types::{ChatRole, Choice, CompletionRequest, CompletionResponse};
use super::ChatBackend;

/// Prefix the extractor puts in front of the raw line
const USER_PROMPT_PREFIX: &str = "Please extract all expenses from this text:";

/// Message sent when the heuristic finds no amount
pub const NO_EXPENSE_MESSAGE: &str = "I couldn't find any expenses in that message.";

/// Scripted reply for the next `complete` call
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this response verbatim
    Response(CompletionResponse),
    /// Fail as a transport error would
    Failure(String),
}

/// Mock chat backend
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    model: String,
    script: Arc<Mutex<VecDeque<MockReply>>>,
    last_request: Arc<Mutex<Option<CompletionRequest>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            model: "mock".to_string(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Create a new instance with a different model
    ///
    /// The script and request recorder stay shared with `self`.
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Queue a reply; queued replies are used in order before the heuristic
    pub fn push_reply(&self, reply: MockReply) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }

    /// Queue a response carrying the given choices
    pub fn push_choices(&self, choices: Vec<Choice>) {
        self.push_reply(MockReply::Response(CompletionResponse { choices }));
    }

    /// Queue a transport-style failure
    pub fn push_failure(&self, message: &str) {
        self.push_reply(MockReply::Failure(message.to_string()));
    }

    /// The most recent request passed to `complete`
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn next_reply(&self) -> Option<MockReply> {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
    }

    /// Build the heuristic reply for a request
    pub fn heuristic_response(request: &CompletionRequest) -> CompletionResponse {
        let line = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| {
                m.content
                    .strip_prefix(USER_PROMPT_PREFIX)
                    .unwrap_or(&m.content)
                    .trim()
            })
            .unwrap_or("");

        let expenses: Vec<serde_json::Value> = split_segments(line)
            .into_iter()
            .filter_map(guess_expense)
            .collect();

        let choice = match request.tools.first() {
            Some(tool) if !expenses.is_empty() => Choice::tool_call(
                &tool.name,
                json!({ "transactions": expenses }).to_string(),
            ),
            _ => Choice::text(NO_EXPENSE_MESSAGE, "stop"),
        };

        CompletionResponse {
            choices: vec![choice],
        }
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        *self
            .last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(request.clone());

        match self.next_reply() {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Failure(message)) => Err(Error::InvalidData(message)),
            None => Ok(Self::heuristic_response(request)),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

/// Split a line into one segment per likely expense
fn split_segments(line: &str) -> Vec<&str> {
    line.split([',', ';', '\n'])
        .flat_map(|part| part.split(" and "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Words that carry no description value
const FILLER_WORDS: &[&str] = &[
    "spent", "paid", "bought", "for", "on", "at", "a", "the", "of", "worth", "rs", "rs.",
    "dollars", "dollar", "rupees", "rupee", "euros", "euro", "pounds", "pound", "usd", "inr",
    "eur", "gbp",
];

fn guess_expense(segment: &str) -> Option<serde_json::Value> {
    let mut amount = None;
    let mut words = Vec::new();

    for token in segment.split_whitespace() {
        let digits = token.trim_matches(|c: char| !c.is_ascii_digit() && c != '.');
        match digits.parse::<f64>() {
            Ok(value) if amount.is_none() && !digits.is_empty() => amount = Some(value),
            _ => {
                let word = token.trim_matches(|c: char| !c.is_alphanumeric());
                if !word.is_empty() && !FILLER_WORDS.contains(&word.to_lowercase().as_str()) {
                    words.push(word);
                }
            }
        }
    }

    let amount = amount?;
    let description = if words.is_empty() {
        "expense".to_string()
    } else {
        words.join(" ")
    };

    Some(json!({
        "transaction_date": "",
        "amount": amount,
        "currency": detect_currency(segment),
        "category": guess_category(&description),
        "description": description,
    }))
}

/// Currency from symbols or words, empty when there is no cue
fn detect_currency(segment: &str) -> &'static str {
    let lower = segment.to_lowercase();
    let has_word = |words: &[&str]| {
        lower
            .split(|c: char| !c.is_alphabetic())
            .any(|w| words.contains(&w))
    };

    if segment.contains('$') || has_word(&["dollar", "dollars", "usd"]) {
        "USD"
    } else if segment.contains('€') || has_word(&["euro", "euros", "eur"]) {
        "EUR"
    } else if segment.contains('₹') || has_word(&["rupee", "rupees", "rs", "inr"]) {
        "INR"
    } else if segment.contains('£') || has_word(&["pound", "pounds", "gbp"]) {
        "GBP"
    } else if segment.contains('¥') {
        "JPY"
    } else {
        ""
    }
}

fn guess_category(description: &str) -> &'static str {
    let d = description.to_lowercase();
    let any = |keys: &[&str]| keys.iter().any(|k| d.contains(k));

    if any(&["lunch", "dinner", "breakfast", "coffee", "snack", "food", "pizza", "restaurant"]) {
        "food"
    } else if any(&["grocer", "vegetable", "fruit", "milk", "supermarket"]) {
        "groceries"
    } else if any(&["uber", "taxi", "cab", "bus", "train", "metro", "fuel", "petrol"]) {
        "transport"
    } else if any(&["hotel", "flight", "airbnb", "trip"]) {
        "travel"
    } else if any(&["movie", "netflix", "concert", "game"]) {
        "entertainment"
    } else if any(&["rent", "electricity", "internet", "phone", "water bill"]) {
        "utilities"
    } else {
        "other"
    }
}
