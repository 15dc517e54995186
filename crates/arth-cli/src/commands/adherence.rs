//! Adherence scoring and budget-vs-actual comparison

use anyhow::Result;
use arth_core::db::Database;
use arth_core::models::{BudgetRecommendation, InsightType};
use arth_core::{compare_budget_vs_actual, dates, score_adherence};
use chrono::{NaiveDate, Utc};

use super::resolve_month;

/// Fetch the budget for a specific month, treating "none stored" as an
/// expected outcome rather than a failure
pub(crate) fn budget_for_month(
    db: &Database,
    user_id: i64,
    month: NaiveDate,
) -> Result<Option<BudgetRecommendation>> {
    match db.recommendation_for_month(user_id, month) {
        Ok(budget) => Ok(Some(budget)),
        Err(arth_core::Error::NoActiveBudget(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn cmd_adherence(db: &Database, user_id: i64, json: bool) -> Result<()> {
    // Adherence is always scored against the current month's budget.
    // A budget stored for an earlier month is not a substitute.
    let current_month = resolve_month(None)?;
    let budget = match budget_for_month(db, user_id, current_month)? {
        Some(budget) => budget,
        None => {
            println!(
                "No budget found for {}. Generate one with:",
                current_month.format("%B %Y")
            );
            println!("  arth generate");
            return Ok(());
        }
    };

    let transactions =
        db.transactions_in_range(user_id, budget.month, dates::month_end(budget.month))?;
    let as_of = Utc::now().date_naive();
    let result = score_adherence(&budget, &transactions, as_of);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!("🎯 Adherence for {}", budget.month_display);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Score: {:.1}/100", result.score);
    println!("   {}", result.message);
    println!(
        "   Spent ₹{} of ₹{} budgeted",
        result.total_spent, result.total_budgeted
    );

    if !result.category_insights.is_empty() {
        println!();
        for insight in &result.category_insights {
            let marker = match insight.insight_type {
                InsightType::Critical => "❗",
                InsightType::Warning => "⚠️ ",
                InsightType::Success => "✅",
            };
            println!("   {} {}", marker, insight.message);
        }
    }

    Ok(())
}

pub fn cmd_compare(db: &Database, user_id: i64, month: Option<&str>) -> Result<()> {
    let target_month = resolve_month(month)?;
    let budget = db.recommendation_for_month(user_id, target_month)?;

    let transactions =
        db.transactions_in_range(user_id, budget.month, dates::month_end(budget.month))?;
    let rows = compare_budget_vs_actual(&budget, &transactions);

    println!();
    println!("⚖️  Budget vs Actual: {}", budget.month_display);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<14} {:>12} {:>12} {:>12}   Used",
        "Category", "Budgeted", "Actual", "Diff"
    );

    for row in rows {
        let actual_str = if row.over_budget {
            format!("\x1b[31m₹{}\x1b[0m", row.actual) // Red for overspend
        } else {
            format!("₹{}", row.actual)
        };

        println!(
            "   {:<14} {:>12} {:>12} {:>12}   {:.0}%",
            row.category_display,
            format!("₹{}", row.budgeted),
            actual_str,
            format!("₹{}", row.difference),
            row.percentage_used
        );
    }

    Ok(())
}
