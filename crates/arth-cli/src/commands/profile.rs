//! Financial profile commands

use std::str::FromStr;

use anyhow::{anyhow, Result};
use arth_core::db::Database;
use rust_decimal::Decimal;

pub fn cmd_profile_show(db: &Database, user_id: i64) -> Result<()> {
    let profile = db.get_or_create_profile(user_id)?;

    println!();
    println!("👤 Financial Profile (user {})", user_id);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Monthly income: ₹{}", profile.monthly_income);
    println!(
        "   Income stability: {:.0}/100",
        profile.income_stability_score
    );
    println!(
        "   Expense volatility: {:.0}/100",
        profile.expense_volatility_score
    );
    println!(
        "   Savings confidence: {:.0}/100",
        profile.savings_confidence_indicator
    );
    println!("   Updated: {}", profile.updated_at.format("%Y-%m-%d %H:%M"));

    Ok(())
}

pub fn cmd_profile_set_income(db: &Database, user_id: i64, income: &str) -> Result<()> {
    let income = Decimal::from_str(income)
        .map_err(|_| anyhow!("Invalid income: {} (use e.g. 50000)", income))?;

    db.set_monthly_income(user_id, income)?;

    println!("✅ Monthly income set to ₹{}", income);
    println!("   Run 'arth generate' to refresh your budget.");

    Ok(())
}
