//! Transaction listing commands

use anyhow::Result;
use arth_core::db::Database;

use super::truncate;

pub fn cmd_transactions_list(db: &Database, user_id: i64, limit: i64) -> Result<()> {
    let transactions = db.recent_transactions(user_id, limit)?;

    if transactions.is_empty() {
        println!("No transactions found. Import some with:");
        println!("  arth import --file statement.csv");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        println!(
            "   {} │ {:>12} │ {:<14} │ {}",
            tx.date,
            format!("₹{}", tx.amount),
            tx.category.display_name(),
            truncate(&tx.merchant_name, 30)
        );
    }

    Ok(())
}
