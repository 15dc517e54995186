//! Adherence scoring
//!
//! Compares a stored recommendation against actual spending to date.
//! The score starts at 100 and loses points per overspent category,
//! weighted by that category's share of the total budget, so blowing a
//! small category does not tank the whole score.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::dates::month_end;
use crate::explain;
use crate::models::{
    AdherenceResult, BudgetRecommendation, Category, CategoryComparison, CategoryInsight,
    InsightType, Transaction,
};

/// Insight band thresholds as fractions of the limit
const SUCCESS_BAND: f64 = 90.0;
const WARNING_BAND: f64 = 110.0;

fn in_month_actuals(
    budget_month: NaiveDate,
    transactions: &[Transaction],
    as_of: NaiveDate,
) -> (BTreeMap<Category, Decimal>, Decimal) {
    let end = as_of.min(month_end(budget_month));
    let mut by_category: BTreeMap<Category, Decimal> = BTreeMap::new();
    let mut total_spent = Decimal::ZERO;
    for t in transactions {
        if t.date >= budget_month && t.date <= end {
            *by_category.entry(t.category).or_insert(Decimal::ZERO) += t.amount;
            total_spent += t.amount;
        }
    }
    (by_category, total_spent)
}

/// Score actual spending against a stored recommendation.
///
/// `transactions` is a fresh fetch for the budget's month; `as_of` bounds
/// "to date". Pure function; the caller resolves which recommendation
/// applies.
pub fn score_adherence(
    budget: &BudgetRecommendation,
    transactions: &[Transaction],
    as_of: NaiveDate,
) -> AdherenceResult {
    let (actual_by_category, total_spent) = in_month_actuals(budget.month, transactions, as_of);

    let total_budgeted: Decimal = budget
        .category_budgets
        .iter()
        .map(|c| c.recommended_limit)
        .sum();

    let mut penalty = 0.0;
    let mut insights = Vec::new();

    for cat in &budget.category_budgets {
        if cat.recommended_limit.is_zero() {
            continue;
        }
        let actual = actual_by_category
            .get(&cat.category)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let percentage_used = (actual / cat.recommended_limit)
            .to_f64()
            .unwrap_or(0.0)
            * 100.0;

        let insight_type = if percentage_used <= SUCCESS_BAND {
            InsightType::Success
        } else if percentage_used <= WARNING_BAND {
            InsightType::Warning
        } else {
            InsightType::Critical
        };

        if percentage_used > 100.0 {
            let overspend_ratio = ((actual - cat.recommended_limit) / cat.recommended_limit)
                .to_f64()
                .unwrap_or(0.0);
            let share = if total_budgeted.is_zero() {
                0.0
            } else {
                (cat.recommended_limit / total_budgeted).to_f64().unwrap_or(0.0)
            };
            penalty += overspend_ratio * 100.0 * share;
        }

        insights.push(CategoryInsight {
            category: cat.category,
            category_display: cat.category_display.clone(),
            insight_type,
            message: explain::adherence_insight(
                &cat.category_display,
                insight_type,
                percentage_used,
                cat.recommended_limit,
            ),
        });
    }

    insights.sort_by_key(|i| (i.insight_type.severity(), i.category));

    let score = ((100.0 - penalty.min(100.0)).clamp(0.0, 100.0) * 10.0).round() / 10.0;
    debug!(score, penalty, %total_spent, "scored budget adherence");

    AdherenceResult {
        score,
        message: explain::adherence_message(score),
        total_budgeted,
        total_spent,
        category_insights: insights,
    }
}

/// Category-wise budget vs actual comparison for a full month
pub fn compare_budget_vs_actual(
    budget: &BudgetRecommendation,
    transactions: &[Transaction],
) -> Vec<CategoryComparison> {
    let (actual_by_category, _) =
        in_month_actuals(budget.month, transactions, month_end(budget.month));

    budget
        .category_budgets
        .iter()
        .map(|cat| {
            let actual = actual_by_category
                .get(&cat.category)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let percentage_used = if cat.recommended_limit.is_zero() {
                0.0
            } else {
                (actual / cat.recommended_limit).to_f64().unwrap_or(0.0) * 100.0
            };
            CategoryComparison {
                category: cat.category,
                category_display: cat.category_display.clone(),
                budgeted: cat.recommended_limit,
                actual,
                difference: cat.recommended_limit - actual,
                percentage_used,
                over_budget: actual > cat.recommended_limit,
            }
        })
        .collect()
}
