//! CSV import and manual transaction entry

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use arth_core::db::Database;
use arth_core::import::{import_hash, parse_csv};
use arth_core::models::{Category, ExpenseClass, NewTransaction, TransactionSource};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

pub fn cmd_import(db: &Database, user_id: i64, file: &Path) -> Result<()> {
    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;

    println!("📥 Importing transactions from {}...", file.display());

    let transactions = parse_csv(csv_file)?;
    println!("   Found {} transactions", transactions.len());

    let stats = db.insert_transactions(user_id, &transactions)?;

    println!("✅ Import complete!");
    println!("   Imported: {}", stats.inserted);
    println!("   Skipped (duplicates): {}", stats.skipped);

    if stats.inserted > 0 {
        println!();
        println!("   Run 'arth generate' to refresh your budget.");
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    db: &Database,
    user_id: i64,
    date: Option<&str>,
    amount: &str,
    category: &str,
    merchant: &str,
    source: &str,
    expense_type: Option<&str>,
) -> Result<()> {
    let date = match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| anyhow!("Invalid --date format: {} (use YYYY-MM-DD)", s))?,
        None => Utc::now().date_naive(),
    };

    let amount = Decimal::from_str(amount)
        .map_err(|_| anyhow!("Invalid --amount: {} (use e.g. 450.50)", amount))?;
    if amount <= Decimal::ZERO {
        return Err(anyhow!("Amount must be positive, got {}", amount));
    }

    let category: Category = category.parse().map_err(|e: String| anyhow!(e))?;
    let source: TransactionSource = source.parse().map_err(|e: String| anyhow!(e))?;
    let expense_type: Option<ExpenseClass> = expense_type
        .map(|s| s.parse().map_err(|e: String| anyhow!(e)))
        .transpose()?;

    let tx = NewTransaction {
        date,
        amount,
        category,
        expense_type,
        merchant_name: merchant.to_string(),
        source,
        import_hash: import_hash(&date, merchant, &amount, category),
    };

    if db.insert_transaction(user_id, &tx)? {
        println!(
            "✅ Recorded ₹{} at {} ({}, {})",
            amount,
            merchant,
            category.display_name(),
            date
        );
    } else {
        println!("Transaction already recorded (same date, merchant, amount).");
    }

    Ok(())
}
