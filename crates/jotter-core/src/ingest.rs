//! Line ingestion: extract expenses and store them
//!
//! Gathers the context the extractor needs (default currency, category
//! history) from the database, so front-ends only deal with raw lines.

use tracing::info;

use crate::db::Database;
use crate::error::Result;
use crate::extract::Extractor;
use crate::models::{Transaction, TransactionBatch};

/// Extraction plus persistence
#[derive(Clone)]
pub struct Ingestor {
    db: Database,
    extractor: Extractor,
    /// Used when the settings table has no currency
    default_currency: String,
}

impl Ingestor {
    pub fn new(db: Database, extractor: Extractor, default_currency: &str) -> Self {
        Self {
            db,
            extractor,
            default_currency: default_currency.to_string(),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Currency from settings, else the configured default
    pub fn currency(&self) -> Result<String> {
        Ok(self
            .db
            .currency_setting()?
            .unwrap_or_else(|| self.default_currency.clone()))
    }

    /// Extract expenses from `line` without storing them
    pub async fn preview(&self, line: &str) -> Result<TransactionBatch> {
        let currency = self.currency()?;
        let catalog = self.db.category_catalog()?;
        let batch = self.extractor.parse(line, &currency, &catalog).await?;
        Ok(batch)
    }

    /// Extract expenses from `line` and store them, returning the stored rows
    pub async fn ingest(&self, line: &str) -> Result<Vec<Transaction>> {
        let batch = self.preview(line).await?;
        let stored = self.db.insert_batch(&batch)?;
        info!(count = stored.len(), "Ingested expenses");
        Ok(stored)
    }
}
