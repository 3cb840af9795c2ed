//! Date and currency defaulting for extracted candidates

use chrono::NaiveDate;
use tracing::warn;

use crate::models::{ExtractedBatch, ExtractedCandidate, TransactionBatch, TransactionCandidate};

use super::prompts::effective_currency;

/// Fills in what the model left out
#[derive(Debug, Clone)]
pub struct Normalizer {
    default_currency: String,
    today: NaiveDate,
}

impl Normalizer {
    /// A blank `default_currency` becomes the fallback currency
    pub fn new(default_currency: &str, today: NaiveDate) -> Self {
        Self {
            default_currency: effective_currency(default_currency),
            today,
        }
    }

    pub fn normalize(&self, batch: ExtractedBatch) -> TransactionBatch {
        TransactionBatch {
            transactions: batch
                .transactions
                .into_iter()
                .map(|c| self.normalize_candidate(c))
                .collect(),
        }
    }

    fn normalize_candidate(&self, candidate: ExtractedCandidate) -> TransactionCandidate {
        let transaction_date = self.resolve_date(
            candidate.transaction_date.as_deref(),
            &candidate.description,
        );

        let currency = match candidate.currency.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_uppercase(),
            _ => self.default_currency.clone(),
        };

        TransactionCandidate {
            transaction_date,
            amount: candidate.amount,
            currency,
            category: candidate.category,
            description: candidate.description,
        }
    }

    fn resolve_date(&self, raw: Option<&str>, description: &str) -> NaiveDate {
        let raw = raw.map(str::trim).unwrap_or("");
        if raw.is_empty() {
            return self.today;
        }
        // chrono accepts unpadded fields; only strict YYYY-MM-DD is taken
        let parsed = if raw.len() == 10 {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| e.to_string())
        } else {
            Err("expected YYYY-MM-DD".to_string())
        };
        match parsed {
            Ok(date) => date,
            Err(e) => {
                warn!(
                    date = %raw,
                    description = %description,
                    error = %e,
                    "Unparseable transaction date, using today"
                );
                self.today
            }
        }
    }
}
