//! Budget generation and retrieval commands

use anyhow::{Context, Result};
use arth_core::db::Database;
use arth_core::models::BudgetRecommendation;
use arth_core::BudgetEngine;

use super::resolve_month;

pub fn cmd_generate(db: &Database, user_id: i64, month: Option<&str>, json: bool) -> Result<()> {
    let target_month = resolve_month(month)?;

    let profile = db.get_or_create_profile(user_id)?;
    let history = db.all_transactions(user_id)?;
    tracing::debug!(
        user_id,
        month = %target_month,
        transactions = history.len(),
        "generating budget"
    );

    let engine = BudgetEngine::new();
    let (budget, scores) = engine
        .generate(&profile, &history, target_month)
        .context("Budget generation failed")?;

    db.upsert_recommendation(user_id, &budget)?;
    db.update_profile_scores(user_id, &scores)?;

    if json {
        let envelope = serde_json::json!({
            "message": format!("Budget generated for {}", budget.month_display),
            "budget": budget,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    println!("✅ Budget generated for {}", budget.month_display);
    print_recommendation(&budget);

    Ok(())
}

pub fn cmd_latest(db: &Database, user_id: i64, json: bool) -> Result<()> {
    let budget = match db.latest_recommendation(user_id)? {
        Some(budget) => budget,
        None => {
            println!("No budget found. Generate one with:");
            println!("  arth generate");
            return Ok(());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&budget)?);
        return Ok(());
    }

    println!("📋 Budget for {}", budget.month_display);
    print_recommendation(&budget);

    Ok(())
}

pub fn cmd_summary(db: &Database, user_id: i64) -> Result<()> {
    let rows = db.recommendation_summary(user_id, 12)?;

    if rows.is_empty() {
        println!("No budgets stored yet. Generate one with:");
        println!("  arth generate");
        return Ok(());
    }

    println!();
    println!("🗂  Stored Budgets");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<16} {:>14} {:>14}   Generated",
        "Month", "Budget", "Savings"
    );

    for row in rows {
        println!(
            "   {:<16} {:>14} {:>14}   {}",
            row.month_display,
            format!("₹{}", row.total_recommended_budget),
            format!("₹{}", row.recommended_savings),
            row.generated_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

/// Shared human-readable rendering of a recommendation
pub fn print_recommendation(budget: &BudgetRecommendation) {
    println!();
    println!("💰 Category Limits");
    println!("   ─────────────────────────────────────────────────────────────");

    for cat in &budget.category_budgets {
        println!(
            "   {:<14} {:>12}  [{}]",
            cat.category_display,
            format!("₹{}", cat.recommended_limit),
            cat.risk_level.as_str()
        );
        println!("      {}", cat.reason);
    }

    println!();
    println!(
        "   Total budget: ₹{}",
        budget.total_recommended_budget
    );
    println!("   Savings target: ₹{}", budget.recommended_savings);
    println!("      {}", budget.savings_reason);

    println!();
    println!("📅 Weekly Plan");
    println!("   ─────────────────────────────────────────────────────────────");
    for week in &budget.weekly_budgets {
        println!(
            "   Week {} ({} to {}): ₹{}",
            week.week_number,
            week.week_start_date,
            week.week_end_date,
            week.recommended_weekly_spending
        );
    }
}
