//! Transaction storage operations

use chrono::NaiveDate;
use rusqlite::params;

use super::{parse_datetime, parse_decimal, Database};
use crate::error::Result;
use crate::models::{Category, NewTransaction, Transaction};

/// Outcome of a bulk insert
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportStats {
    pub inserted: usize,
    /// Rows skipped as duplicates of already-stored transactions
    pub skipped: usize,
}

const TRANSACTION_COLUMNS: &str =
    "id, user_id, date, amount, category, expense_type, merchant_name, source, created_at";

impl Database {
    /// Insert a transaction; returns false when the import hash already exists
    pub fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            r#"
            INSERT OR IGNORE INTO transactions
                (user_id, date, amount, category, expense_type, merchant_name, source, import_hash)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.date.to_string(),
                tx.amount.to_string(),
                tx.category.as_str(),
                tx.expense_type.map(|e| e.as_str()),
                tx.merchant_name,
                tx.source.as_str(),
                tx.import_hash,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Insert a batch, skipping duplicates
    pub fn insert_transactions(&self, user_id: i64, txns: &[NewTransaction]) -> Result<ImportStats> {
        let mut stats = ImportStats::default();
        for tx in txns {
            if self.insert_transaction(user_id, tx)? {
                stats.inserted += 1;
            } else {
                stats.skipped += 1;
            }
        }
        Ok(stats)
    }

    /// All of a user's transactions, oldest first (engine input)
    pub fn all_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE user_id = ? ORDER BY date, id",
            TRANSACTION_COLUMNS
        ))?;
        let transactions = stmt
            .query_map(params![user_id], |row| Self::row_to_transaction(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    /// Transactions in an inclusive date range, oldest first
    pub fn transactions_in_range(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions
             WHERE user_id = ? AND date BETWEEN ? AND ?
             ORDER BY date, id",
            TRANSACTION_COLUMNS
        ))?;
        let transactions = stmt
            .query_map(
                params![user_id, from.to_string(), to.to_string()],
                |row| Self::row_to_transaction(row),
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    /// Most recent transactions for listing
    pub fn recent_transactions(&self, user_id: i64, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE user_id = ?
             ORDER BY date DESC, id DESC LIMIT ?",
            TRANSACTION_COLUMNS
        ))?;
        let transactions = stmt
            .query_map(params![user_id, limit], |row| Self::row_to_transaction(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    /// Count a user's transactions
    pub fn transaction_count(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Helper to convert a row to Transaction.
    /// Column order matches TRANSACTION_COLUMNS.
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let date_str: String = row.get(2)?;
        let amount_str: String = row.get(3)?;
        let category_str: String = row.get(4)?;
        let expense_type_str: Option<String> = row.get(5)?;
        let source_str: String = row.get(7)?;
        let created_at_str: String = row.get(8)?;
        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default(),
            amount: parse_decimal(&amount_str),
            category: category_str.parse().unwrap_or(Category::Other),
            expense_type: expense_type_str.and_then(|s| s.parse().ok()),
            merchant_name: row.get(6)?,
            source: source_str.parse().unwrap_or_default(),
            created_at: parse_datetime(&created_at_str),
        })
    }
}
