//! Budget recommendation storage
//!
//! At most one canonical recommendation exists per (user, month). The
//! upsert runs inside a single SQLite transaction so concurrent
//! regeneration is last-writer-wins with no interleaved partial writes.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, parse_decimal, Database};
use crate::dates::month_start;
use crate::error::{Error, Result};
use crate::models::{
    BudgetRecommendation, BudgetSummaryRow, Category, CategoryBudget, RiskTier, WeeklyBudget,
};

impl Database {
    /// Atomically replace the recommendation for (user, month).
    /// Returns the budget row id.
    pub fn upsert_recommendation(
        &self,
        user_id: i64,
        budget: &BudgetRecommendation,
    ) -> Result<i64> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO budgets
                (user_id, month, total_recommended_budget, recommended_savings,
                 savings_reason, generated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, month) DO UPDATE SET
                total_recommended_budget = excluded.total_recommended_budget,
                recommended_savings = excluded.recommended_savings,
                savings_reason = excluded.savings_reason,
                generated_at = excluded.generated_at
            "#,
            params![
                user_id,
                budget.month.to_string(),
                budget.total_recommended_budget.to_string(),
                budget.recommended_savings.to_string(),
                budget.savings_reason,
                budget.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ],
        )?;

        let budget_id: i64 = tx.query_row(
            "SELECT id FROM budgets WHERE user_id = ? AND month = ?",
            params![user_id, budget.month.to_string()],
            |row| row.get(0),
        )?;

        // Children are replaced wholesale; superseded, never merged
        tx.execute(
            "DELETE FROM category_budgets WHERE budget_id = ?",
            params![budget_id],
        )?;
        tx.execute(
            "DELETE FROM weekly_budgets WHERE budget_id = ?",
            params![budget_id],
        )?;

        for cat in &budget.category_budgets {
            tx.execute(
                r#"
                INSERT INTO category_budgets
                    (budget_id, category, recommended_limit, actual_average,
                     variance, risk_level, reason)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    budget_id,
                    cat.category.as_str(),
                    cat.recommended_limit.to_string(),
                    cat.actual_average.to_string(),
                    cat.variance.to_string(),
                    cat.risk_level.as_str(),
                    cat.reason,
                ],
            )?;
        }

        for week in &budget.weekly_budgets {
            tx.execute(
                r#"
                INSERT INTO weekly_budgets
                    (budget_id, week_number, week_start_date, week_end_date,
                     recommended_weekly_spending, explanation)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
                params![
                    budget_id,
                    week.week_number,
                    week.week_start_date.to_string(),
                    week.week_end_date.to_string(),
                    week.recommended_weekly_spending.to_string(),
                    week.explanation,
                ],
            )?;
        }

        tx.commit()?;
        Ok(budget_id)
    }

    /// The most recent recommendation for a user, if any
    pub fn latest_recommendation(&self, user_id: i64) -> Result<Option<BudgetRecommendation>> {
        let conn = self.conn()?;
        let budget_id: Option<i64> = conn
            .query_row(
                "SELECT id FROM budgets WHERE user_id = ?
                 ORDER BY month DESC, generated_at DESC LIMIT 1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        match budget_id {
            Some(id) => Ok(Some(self.load_recommendation(id)?)),
            None => Ok(None),
        }
    }

    /// The canonical recommendation for a month.
    /// Fails with [`Error::NoActiveBudget`] when none exists.
    pub fn recommendation_for_month(
        &self,
        user_id: i64,
        month: NaiveDate,
    ) -> Result<BudgetRecommendation> {
        let month = month_start(month);
        let conn = self.conn()?;
        let budget_id: Option<i64> = conn
            .query_row(
                "SELECT id FROM budgets WHERE user_id = ? AND month = ?",
                params![user_id, month.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        match budget_id {
            Some(id) => self.load_recommendation(id),
            None => Err(Error::NoActiveBudget(format!(
                "no recommendation for {}; generate a budget first",
                month.format("%B %Y")
            ))),
        }
    }

    /// Summary rows for the user's most recent recommendations
    pub fn recommendation_summary(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<BudgetSummaryRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT month, total_recommended_budget, recommended_savings, generated_at
             FROM budgets WHERE user_id = ?
             ORDER BY month DESC LIMIT ?",
        )?;
        let rows = stmt
            .query_map(params![user_id, limit], |row| {
                let month_str: String = row.get(0)?;
                let total_str: String = row.get(1)?;
                let savings_str: String = row.get(2)?;
                let generated_str: String = row.get(3)?;
                let month =
                    NaiveDate::parse_from_str(&month_str, "%Y-%m-%d").unwrap_or_default();
                Ok(BudgetSummaryRow {
                    month,
                    month_display: month.format("%B %Y").to_string(),
                    total_recommended_budget: parse_decimal(&total_str),
                    recommended_savings: parse_decimal(&savings_str),
                    generated_at: parse_datetime(&generated_str),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Assemble a full recommendation from its rows
    fn load_recommendation(&self, budget_id: i64) -> Result<BudgetRecommendation> {
        let conn = self.conn()?;

        let (month, total, savings, savings_reason, generated_at) = conn.query_row(
            "SELECT month, total_recommended_budget, recommended_savings,
                    savings_reason, generated_at
             FROM budgets WHERE id = ?",
            params![budget_id],
            |row| {
                let month_str: String = row.get(0)?;
                let total_str: String = row.get(1)?;
                let savings_str: String = row.get(2)?;
                let reason: String = row.get(3)?;
                let generated_str: String = row.get(4)?;
                Ok((
                    NaiveDate::parse_from_str(&month_str, "%Y-%m-%d").unwrap_or_default(),
                    parse_decimal(&total_str),
                    parse_decimal(&savings_str),
                    reason,
                    parse_datetime(&generated_str),
                ))
            },
        )?;

        let mut stmt = conn.prepare(
            "SELECT category, recommended_limit, actual_average, variance, risk_level, reason
             FROM category_budgets WHERE budget_id = ? ORDER BY id",
        )?;
        let category_budgets = stmt
            .query_map(params![budget_id], |row| {
                let category_str: String = row.get(0)?;
                let limit_str: String = row.get(1)?;
                let actual_str: String = row.get(2)?;
                let variance_str: String = row.get(3)?;
                let risk_str: String = row.get(4)?;
                let category = category_str.parse().unwrap_or(Category::Other);
                Ok(CategoryBudget {
                    category,
                    category_display: category.display_name().to_string(),
                    recommended_limit: parse_decimal(&limit_str),
                    actual_average: parse_decimal(&actual_str),
                    variance: parse_decimal(&variance_str),
                    risk_level: risk_str.parse().unwrap_or(RiskTier::Low),
                    reason: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT week_number, week_start_date, week_end_date,
                    recommended_weekly_spending, explanation
             FROM weekly_budgets WHERE budget_id = ? ORDER BY week_number",
        )?;
        let weekly_budgets = stmt
            .query_map(params![budget_id], |row| {
                let start_str: String = row.get(1)?;
                let end_str: String = row.get(2)?;
                let amount_str: String = row.get(3)?;
                Ok(WeeklyBudget {
                    week_number: row.get(0)?,
                    week_start_date: NaiveDate::parse_from_str(&start_str, "%Y-%m-%d")
                        .unwrap_or_default(),
                    week_end_date: NaiveDate::parse_from_str(&end_str, "%Y-%m-%d")
                        .unwrap_or_default(),
                    recommended_weekly_spending: parse_decimal(&amount_str),
                    explanation: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(BudgetRecommendation {
            month,
            month_display: month.format("%B %Y").to_string(),
            total_recommended_budget: total,
            recommended_savings: savings,
            savings_reason,
            category_budgets,
            weekly_budgets,
            generated_at,
        })
    }
}
