//! Transaction operations

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{date_column, parse_datetime, Database};
use crate::categories::CategoryCatalog;
use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionBatch, TransactionFilter, TransactionUpdate};

const SELECT_COLUMNS: &str = "SELECT id, created_at, transaction_date, amount, currency, category, description, confirm FROM transactions";

/// WHERE clause and parameters for a filter (limit/offset excluded)
pub(super) fn filter_clause(filter: &TransactionFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
    let mut conditions = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(confirm) = filter.confirm {
        conditions.push("confirm = ?");
        params.push(Box::new(confirm));
    }
    if let Some(from) = filter.from {
        conditions.push("transaction_date >= ?");
        params.push(Box::new(from.to_string()));
    }
    if let Some(to) = filter.to {
        conditions.push("transaction_date <= ?");
        params.push(Box::new(to.to_string()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, params)
}

impl Database {
    /// Store every candidate of a batch in one SQL transaction
    ///
    /// Returns the stored rows in batch order.
    pub fn insert_batch(&self, batch: &TransactionBatch) -> Result<Vec<Transaction>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let mut ids = Vec::with_capacity(batch.len());
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO transactions (transaction_date, amount, currency, category, description, confirm)
                VALUES (?, ?, ?, ?, ?, 0)
                "#,
            )?;
            for candidate in batch.iter() {
                stmt.execute(params![
                    candidate.transaction_date.to_string(),
                    candidate.amount,
                    candidate.currency,
                    candidate.category,
                    candidate.description,
                ])?;
                ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;
        drop(conn);

        debug!(count = ids.len(), "Stored transactions");

        let mut stored = Vec::with_capacity(ids.len());
        for id in ids {
            let row = self
                .get_transaction(id)?
                .ok_or_else(|| Error::NotFound(format!("transaction {}", id)))?;
            stored.push(row);
        }
        Ok(stored)
    }

    /// Get a transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_COLUMNS),
                params![id],
                Self::row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    /// List transactions, newest transaction date first
    pub fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let (where_clause, mut params) = filter_clause(filter);

        let sql = format!(
            "{} {} ORDER BY transaction_date DESC, id DESC LIMIT ? OFFSET ?",
            SELECT_COLUMNS, where_clause
        );
        // SQLite treats a negative LIMIT as "no limit"
        params.push(Box::new(filter.limit.unwrap_or(-1)));
        params.push(Box::new(filter.offset.unwrap_or(0)));

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let transactions = stmt
            .query_map(params_refs.as_slice(), Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Replace the editable fields of a transaction
    ///
    /// A missing `transaction_date` keeps the stored date.
    pub fn update_transaction(&self, id: i64, update: &TransactionUpdate) -> Result<Transaction> {
        let conn = self.conn()?;
        let changed = conn.execute(
            r#"
            UPDATE transactions
            SET transaction_date = COALESCE(?, transaction_date),
                amount = ?, currency = ?, category = ?, description = ?, confirm = ?
            WHERE id = ?
            "#,
            params![
                update.transaction_date.map(|d| d.to_string()),
                update.amount,
                update.currency.trim().to_uppercase(),
                update.category,
                update.description,
                update.confirm,
                id,
            ],
        )?;
        drop(conn);

        if changed == 0 {
            return Err(Error::NotFound(format!("transaction {}", id)));
        }
        self.get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", id)))
    }

    /// Mark a transaction as reviewed, returns false if it does not exist
    pub fn confirm_transaction(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE transactions SET confirm = 1 WHERE id = ?",
            params![id],
        )?;
        Ok(changed > 0)
    }

    /// Delete a transaction, returns false if it does not exist
    pub fn delete_transaction(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        Ok(changed > 0)
    }

    /// Count all stored transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Categories the user has used, most recently used first
    pub fn category_catalog(&self) -> Result<CategoryCatalog> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category FROM transactions
            WHERE TRIM(category) != ''
            GROUP BY category
            ORDER BY MAX(created_at) DESC, MAX(id) DESC
            "#,
        )?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(names.into_iter().collect())
    }

    fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
        let created_at: String = row.get(1)?;
        Ok(Transaction {
            id: row.get(0)?,
            created_at: parse_datetime(&created_at),
            transaction_date: date_column(row, 2)?,
            amount: row.get(3)?,
            currency: row.get(4)?,
            category: row.get(5)?,
            description: row.get(6)?,
            confirm: row.get(7)?,
        })
    }
}
