//! Budget recommendation engine
//!
//! Pure orchestration: aggregate the lookback window, filter anomalies,
//! measure volatility, classify each category, apply the buffer policy,
//! plan savings, and cut the month into weekly targets. All I/O happens
//! in the caller; the engine is a function of its inputs.

use chrono::{NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::info;

use crate::dates::{month_display, month_start};
use crate::error::{Error, Result};
use crate::explain;
use crate::models::{
    BudgetRecommendation, CategoryBudget, FinancialProfile, ProfileScores, Transaction,
};
use crate::policy;
use crate::schedule;
use crate::stats;

/// Policy constants for budget generation.
///
/// These are tunable policy, not hard requirements; the defaults match
/// the product's shipped behavior.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Calendar months of history to analyze (clamped to what exists)
    pub lookback_months: u32,
    /// A transaction is anomalous beyond mean + k * stddev
    pub anomaly_stddev_factor: f64,
    /// Minimum category observations before anomaly judgment is made
    pub anomaly_min_observations: usize,
    /// cv below this is low risk
    pub cv_medium_threshold: f64,
    /// cv below this is medium risk, above is high
    pub cv_high_threshold: f64,
    /// Savings below this fraction of income get the constrained reason
    pub min_viable_savings_ratio: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookback_months: 3,
            anomaly_stddev_factor: 2.5,
            anomaly_min_observations: 4,
            cv_medium_threshold: 0.10,
            cv_high_threshold: 0.25,
            min_viable_savings_ratio: Decimal::new(5, 2), // 5% of income
        }
    }
}

/// The budget recommendation engine
#[derive(Debug, Clone, Default)]
pub struct BudgetEngine {
    config: EngineConfig,
}

impl BudgetEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate a recommendation for `target_month` from the profile and
    /// transaction history.
    ///
    /// Returns the recommendation plus the recomputed profile scores; the
    /// caller persists both as one unit. Fails with
    /// [`Error::InvalidProfile`] on non-positive income and
    /// [`Error::InsufficientData`] when the lookback window is empty.
    pub fn generate(
        &self,
        profile: &FinancialProfile,
        transactions: &[Transaction],
        target_month: NaiveDate,
    ) -> Result<(BudgetRecommendation, ProfileScores)> {
        if profile.monthly_income <= Decimal::ZERO {
            return Err(Error::InvalidProfile(format!(
                "monthly income must be positive, got {}",
                profile.monthly_income
            )));
        }

        let target = month_start(target_month);
        let analysis = stats::analyze(transactions, target, &self.config)?;

        let mut category_budgets = Vec::with_capacity(analysis.stats.len());
        let mut total = Decimal::ZERO;
        for stat in &analysis.stats {
            let percent = policy::buffer_percent(stat.classification, stat.risk_tier);
            let limit = policy::recommended_limit(stat.baseline_average, percent);
            let reason =
                explain::category_reason(stat, percent, limit, analysis.window_months);
            total += limit;
            category_budgets.push(CategoryBudget {
                category: stat.category,
                category_display: stat.category.display_name().to_string(),
                recommended_limit: limit,
                actual_average: stat.actual_average,
                variance: limit - stat.actual_average,
                risk_level: stat.risk_tier,
                reason,
            });
        }

        let savings = policy::plan_savings(
            profile.monthly_income,
            total,
            analysis.overall_volatility_score,
            &self.config,
        );

        let weekly_budgets = schedule::weekly_budgets(target, total);

        let savings_ratio = (savings.recommended_savings / profile.monthly_income)
            .to_f64()
            .unwrap_or(0.0);
        let scores = ProfileScores {
            expense_volatility_score: analysis.overall_volatility_score,
            savings_confidence_indicator: policy::savings_confidence(
                savings_ratio,
                profile.income_stability_score,
                analysis.overall_volatility_score,
            ),
        };

        info!(
            month = %target,
            categories = category_budgets.len(),
            window_months = analysis.window_months,
            total = %total,
            savings = %savings.recommended_savings,
            "generated budget recommendation"
        );

        Ok((
            BudgetRecommendation {
                month: target,
                month_display: month_display(target),
                total_recommended_budget: total,
                recommended_savings: savings.recommended_savings,
                savings_reason: savings.reason,
                category_budgets,
                weekly_budgets,
                generated_at: Utc::now(),
            },
            scores,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, RiskTier, TransactionSource};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn txn(date: NaiveDate, amount: Decimal, category: Category) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            date,
            amount,
            category,
            expense_type: None,
            merchant_name: "m".to_string(),
            source: TransactionSource::Upi,
            created_at: Utc::now(),
        }
    }

    fn profile(income: Decimal) -> FinancialProfile {
        FinancialProfile {
            user_id: 1,
            monthly_income: income,
            income_stability_score: 85.0,
            expense_volatility_score: 0.0,
            savings_confidence_indicator: 0.0,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_stable_food_gets_ten_percent_buffer() {
        let txns = vec![
            txn(d(2026, 6, 5), dec!(6000), Category::Food),
            txn(d(2026, 7, 5), dec!(6200), Category::Food),
            txn(d(2026, 8, 5), dec!(6400), Category::Food),
        ];
        let engine = BudgetEngine::new();
        let (rec, _) = engine.generate(&profile(dec!(50000)), &txns, d(2026, 9, 1)).unwrap();

        assert_eq!(rec.month, d(2026, 9, 1));
        assert_eq!(rec.month_display, "September 2026");
        assert_eq!(rec.category_budgets.len(), 1);
        let food = &rec.category_budgets[0];
        assert_eq!(food.recommended_limit, dec!(6820.00));
        assert_eq!(food.actual_average, dec!(6200.00));
        assert_eq!(food.risk_level, RiskTier::Low);
        assert_eq!(rec.total_recommended_budget, dec!(6820.00));
        assert_eq!(rec.recommended_savings, dec!(43180.00));
    }

    #[test]
    fn test_limits_plus_savings_bounded_by_income() {
        let txns = vec![
            txn(d(2026, 6, 1), dec!(25000), Category::Rent),
            txn(d(2026, 7, 1), dec!(25000), Category::Rent),
            txn(d(2026, 8, 1), dec!(25000), Category::Rent),
            txn(d(2026, 6, 10), dec!(6000), Category::Food),
            txn(d(2026, 7, 10), dec!(7000), Category::Food),
            txn(d(2026, 8, 10), dec!(5000), Category::Food),
        ];
        let engine = BudgetEngine::new();
        let income = dec!(50000);
        let (rec, _) = engine.generate(&profile(income), &txns, d(2026, 9, 1)).unwrap();

        let total: Decimal = rec
            .category_budgets
            .iter()
            .map(|c| c.recommended_limit)
            .sum();
        assert_eq!(total, rec.total_recommended_budget);
        assert!(total + rec.recommended_savings <= income);
        for cat in &rec.category_budgets {
            assert!(cat.recommended_limit >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_weekly_budgets_sum_to_total() {
        let txns = vec![
            txn(d(2026, 6, 10), dec!(3333.33), Category::Groceries),
            txn(d(2026, 7, 10), dec!(3333.33), Category::Groceries),
            txn(d(2026, 8, 10), dec!(3333.35), Category::Groceries),
        ];
        let engine = BudgetEngine::new();
        let (rec, _) = engine.generate(&profile(dec!(50000)), &txns, d(2026, 9, 1)).unwrap();
        let sum: Decimal = rec
            .weekly_budgets
            .iter()
            .map(|w| w.recommended_weekly_spending)
            .sum();
        assert_eq!(sum, rec.total_recommended_budget);
    }

    #[test]
    fn test_no_history_fails_with_insufficient_data() {
        let engine = BudgetEngine::new();
        let err = engine
            .generate(&profile(dec!(50000)), &[], d(2026, 9, 1))
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn test_non_positive_income_fails() {
        let txns = vec![txn(d(2026, 8, 1), dec!(100), Category::Food)];
        let engine = BudgetEngine::new();
        let err = engine
            .generate(&profile(dec!(0)), &txns, d(2026, 9, 1))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidProfile(_)));
    }

    #[test]
    fn test_regeneration_is_deterministic_apart_from_timestamp() {
        let txns = vec![
            txn(d(2026, 6, 5), dec!(6000), Category::Food),
            txn(d(2026, 7, 5), dec!(6200), Category::Food),
            txn(d(2026, 8, 5), dec!(6400), Category::Food),
        ];
        let engine = BudgetEngine::new();
        let p = profile(dec!(50000));
        let (a, _) = engine.generate(&p, &txns, d(2026, 9, 1)).unwrap();
        let (b, _) = engine.generate(&p, &txns, d(2026, 9, 1)).unwrap();
        assert_eq!(a.total_recommended_budget, b.total_recommended_budget);
        assert_eq!(a.recommended_savings, b.recommended_savings);
        assert_eq!(a.category_budgets.len(), b.category_budgets.len());
    }

    #[test]
    fn test_target_month_normalized_to_first_day() {
        let txns = vec![
            txn(d(2026, 8, 5), dec!(1000), Category::Transport),
        ];
        let engine = BudgetEngine::new();
        let (rec, _) = engine
            .generate(&profile(dec!(50000)), &txns, d(2026, 9, 17))
            .unwrap();
        assert_eq!(rec.month, d(2026, 9, 1));
    }

    #[test]
    fn test_scores_reflect_analysis() {
        let txns = vec![
            txn(d(2026, 6, 5), dec!(6000), Category::Food),
            txn(d(2026, 7, 5), dec!(6200), Category::Food),
            txn(d(2026, 8, 5), dec!(6400), Category::Food),
        ];
        let engine = BudgetEngine::new();
        let (_, scores) = engine
            .generate(&profile(dec!(50000)), &txns, d(2026, 9, 1))
            .unwrap();
        assert!(scores.expense_volatility_score < 10.0);
        assert!(scores.savings_confidence_indicator > 50.0);
    }
}
