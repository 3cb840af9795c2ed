//! Domain models for Jotter

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One expense as the model returned it, before defaults are applied
///
/// `transaction_date` and `currency` may be missing; the normalizer fills them.
/// The other fields are required and a missing one fails decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedCandidate {
    #[serde(default)]
    pub transaction_date: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    pub category: String,
    pub description: String,
}

/// Tool-call arguments of `categorize_expenses`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedBatch {
    pub transactions: Vec<ExtractedCandidate>,
}

/// One parsed and normalized expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCandidate {
    pub transaction_date: NaiveDate,
    pub amount: f64,
    pub currency: String,
    pub category: String,
    pub description: String,
}

impl From<&TransactionCandidate> for ExtractedCandidate {
    fn from(c: &TransactionCandidate) -> Self {
        Self {
            transaction_date: Some(c.transaction_date.format("%Y-%m-%d").to_string()),
            amount: c.amount,
            currency: Some(c.currency.clone()),
            category: c.category.clone(),
            description: c.description.clone(),
        }
    }
}

/// All expenses parsed from a single input line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionBatch {
    pub transactions: Vec<TransactionCandidate>,
}

impl TransactionBatch {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransactionCandidate> {
        self.transactions.iter()
    }
}

impl From<&TransactionBatch> for ExtractedBatch {
    fn from(batch: &TransactionBatch) -> Self {
        Self {
            transactions: batch.iter().map(ExtractedCandidate::from).collect(),
        }
    }
}

impl IntoIterator for TransactionBatch {
    type Item = TransactionCandidate;
    type IntoIter = std::vec::IntoIter<TransactionCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.into_iter()
    }
}

/// A stored transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub transaction_date: NaiveDate,
    pub amount: f64,
    pub currency: String,
    pub category: String,
    pub description: String,
    /// Whether the user has reviewed this LLM-extracted row
    pub confirm: bool,
}

/// Editable fields of a stored transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionUpdate {
    pub transaction_date: Option<NaiveDate>,
    pub amount: f64,
    pub currency: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub confirm: bool,
}

/// Filters for listing and reporting
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only confirmed (true) or unconfirmed (false) rows
    pub confirm: Option<bool>,
    /// Inclusive start date
    pub from: Option<NaiveDate>,
    /// Inclusive end date
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Total spend per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total_spent: f64,
}

/// Total spend per day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySpending {
    pub transaction_date: NaiveDate,
    pub total_spent: f64,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_expenses: f64,
    pub transaction_count: i64,
    pub category_count: i64,
}

/// User settings stored alongside the transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Default currency (ISO 4217)
    pub currency: String,
    /// IANA timezone name, informational for front-ends
    pub timezone: String,
}
