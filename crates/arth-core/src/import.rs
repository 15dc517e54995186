//! CSV import for transaction history
//!
//! Expected columns: `date,amount,category,merchant,source,expense_type`
//! with ISO dates; `source` and `expense_type` are optional. Each row gets
//! a content hash so re-importing the same file is a no-op at the
//! database layer.

use std::io::Read;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, ExpenseClass, NewTransaction, TransactionSource};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    amount: String,
    category: String,
    merchant: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    expense_type: String,
}

/// Dedup hash over the fields that identify a transaction
pub fn import_hash(date: &NaiveDate, merchant: &str, amount: &Decimal, category: Category) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.to_string());
    hasher.update("|");
    hasher.update(merchant);
    hasher.update("|");
    hasher.update(amount.to_string());
    hasher.update("|");
    hasher.update(category.as_str());
    hex::encode(hasher.finalize())
}

/// Parse CSV data into transactions ready for insertion
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<NewTransaction>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut transactions = Vec::new();
    for (i, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let line = i + 2; // header is line 1
        let row = row.map_err(|e| Error::Import(format!("line {}: {}", line, e)))?;

        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
            .map_err(|e| Error::Import(format!("line {}: bad date '{}': {}", line, row.date, e)))?;

        let amount = Decimal::from_str(&row.amount)
            .map_err(|e| Error::Import(format!("line {}: bad amount '{}': {}", line, row.amount, e)))?;
        if amount.is_sign_negative() {
            return Err(Error::Import(format!(
                "line {}: negative amount '{}'; expenses are recorded as positive values",
                line, row.amount
            )));
        }

        let category = Category::from_str(&row.category)
            .map_err(|e| Error::Import(format!("line {}: {}", line, e)))?;

        let source = if row.source.is_empty() {
            TransactionSource::Manual
        } else {
            TransactionSource::from_str(&row.source)
                .map_err(|e| Error::Import(format!("line {}: {}", line, e)))?
        };

        let expense_type = if row.expense_type.is_empty() {
            None
        } else {
            Some(
                ExpenseClass::from_str(&row.expense_type)
                    .map_err(|e| Error::Import(format!("line {}: {}", line, e)))?,
            )
        };

        let hash = import_hash(&date, &row.merchant, &amount, category);
        transactions.push(NewTransaction {
            date,
            amount,
            category,
            expense_type,
            merchant_name: row.merchant,
            source,
            import_hash: hash,
        });
    }

    debug!(rows = transactions.len(), "parsed transaction CSV");
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "\
date,amount,category,merchant,source,expense_type
2026-06-05,6000.00,food,Big Bazaar,upi,
2026-07-05,6200,food,Big Bazaar,card,
2026-08-01,25000,rent,Landlord,bank,fixed
";

    #[test]
    fn test_parse_sample() {
        let txns = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].amount, dec!(6000.00));
        assert_eq!(txns[0].category, Category::Food);
        assert_eq!(txns[0].source, TransactionSource::Upi);
        assert_eq!(txns[0].expense_type, None);
        assert_eq!(txns[2].expense_type, Some(ExpenseClass::Fixed));
    }

    #[test]
    fn test_optional_columns_default() {
        let csv = "date,amount,category,merchant\n2026-08-01,100,food,Cafe\n";
        let txns = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(txns[0].source, TransactionSource::Manual);
        assert_eq!(txns[0].expense_type, None);
    }

    #[test]
    fn test_bad_date_names_the_line() {
        let csv = "date,amount,category,merchant\n08/01/2026,100,food,Cafe\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let csv = "date,amount,category,merchant\n2026-08-01,-100,food,Cafe\n";
        assert!(parse_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let csv = "date,amount,category,merchant\n2026-08-01,100,yachts,Marina\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Unknown category"));
    }

    #[test]
    fn test_hash_stable_and_distinct() {
        let txns = parse_csv(SAMPLE.as_bytes()).unwrap();
        let again = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(txns[0].import_hash, again[0].import_hash);
        assert_ne!(txns[0].import_hash, txns[1].import_hash);
    }
}
