//! Spending reports
//!
//! Amounts are summed as stored; rows in different currencies are not converted.

use super::transactions::filter_clause;
use super::{date_column, Database};
use crate::error::Result;
use crate::models::{CategorySummary, DailySpending, DashboardStats, TransactionFilter};

impl Database {
    /// Total spend per category, largest first
    pub fn category_summary(&self, filter: &TransactionFilter) -> Result<Vec<CategorySummary>> {
        let conn = self.conn()?;
        let (where_clause, params) = filter_clause(filter);
        let sql = format!(
            r#"
            SELECT category, COALESCE(SUM(amount), 0) AS total
            FROM transactions
            {}
            GROUP BY category
            ORDER BY total DESC, category ASC
            "#,
            where_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(params_refs.as_slice(), |row| {
                Ok(CategorySummary {
                    category: row.get(0)?,
                    total_spent: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Total spend per day, oldest first
    pub fn daily_spending(&self, filter: &TransactionFilter) -> Result<Vec<DailySpending>> {
        let conn = self.conn()?;
        let (where_clause, params) = filter_clause(filter);
        let sql = format!(
            r#"
            SELECT transaction_date, COALESCE(SUM(amount), 0)
            FROM transactions
            {}
            GROUP BY transaction_date
            ORDER BY transaction_date ASC
            "#,
            where_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(params_refs.as_slice(), |row| {
                Ok(DailySpending {
                    transaction_date: date_column(row, 0)?,
                    total_spent: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Headline totals
    pub fn dashboard_stats(&self, filter: &TransactionFilter) -> Result<DashboardStats> {
        let conn = self.conn()?;
        let (where_clause, params) = filter_clause(filter);
        let sql = format!(
            r#"
            SELECT COALESCE(SUM(amount), 0), COUNT(*), COUNT(DISTINCT category)
            FROM transactions
            {}
            "#,
            where_clause
        );

        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let stats = conn.query_row(&sql, params_refs.as_slice(), |row| {
            Ok(DashboardStats {
                total_expenses: row.get(0)?,
                transaction_count: row.get(1)?,
                category_count: row.get(2)?,
            })
        })?;

        Ok(stats)
    }
}
