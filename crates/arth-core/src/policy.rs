//! Buffer policy and savings planning
//!
//! The buffer applied to a category baseline is a data table keyed by
//! (spending class, risk tier). Discretionary spending in the high tier
//! gets a negative adjustment: the recommendation goes below the baseline
//! instead of above it.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::engine::EngineConfig;
use crate::explain;
use crate::models::{ExpenseClass, RiskTier};

/// Signed buffer percent by [class][tier].
/// Rows: fixed, variable_essential, discretionary.
/// Columns: low, medium, high.
const BUFFER_PERCENT: [[i64; 3]; 3] = [
    [5, 5, 10],    // fixed
    [10, 15, 20],  // variable_essential
    [10, 15, -10], // discretionary: high volatility means rein it in
];

/// Look up the signed buffer percent for a (class, tier) pair
pub fn buffer_percent(class: ExpenseClass, tier: RiskTier) -> i64 {
    BUFFER_PERCENT[class.index()][tier.index()]
}

/// Apply a signed buffer percent to a baseline average.
/// Never negative; a heavy reduction floors at zero.
pub fn recommended_limit(baseline_average: Decimal, percent: i64) -> Decimal {
    let factor = Decimal::from(100 + percent) / Decimal::from(100);
    (baseline_average * factor).round_dp(2).max(Decimal::ZERO)
}

/// A month-level savings recommendation
#[derive(Debug, Clone)]
pub struct SavingsPlan {
    pub recommended_savings: Decimal,
    pub reason: String,
    /// True when savings fell below the minimum-viable threshold
    pub constrained: bool,
}

/// Derive the savings target from income and total recommended spending.
///
/// `recommended_savings = max(0, income - total)`. When that lands below
/// the minimum-viable threshold (a fraction of income), the reason states
/// the constraint instead of pretending a percentage was targeted.
pub fn plan_savings(
    monthly_income: Decimal,
    total_recommended: Decimal,
    overall_volatility_score: f64,
    config: &EngineConfig,
) -> SavingsPlan {
    let savings = (monthly_income - total_recommended).max(Decimal::ZERO);

    let threshold = (monthly_income * config.min_viable_savings_ratio).round_dp(2);
    let constrained = savings < threshold;

    let savings_ratio = if monthly_income.is_zero() {
        0.0
    } else {
        (savings / monthly_income).to_f64().unwrap_or(0.0)
    };

    let reason = explain::savings_reason(
        savings,
        monthly_income,
        total_recommended,
        savings_ratio,
        overall_volatility_score,
        constrained,
    );

    SavingsPlan {
        recommended_savings: savings,
        reason,
        constrained,
    }
}

/// Confidence that the savings target will be met, 0-100.
///
/// Three weighted components: the savings fraction of income (saturating
/// at 40% of income), income stability, and the inverse of spending
/// volatility.
pub fn savings_confidence(
    savings_ratio: f64,
    income_stability_score: f64,
    overall_volatility_score: f64,
) -> f64 {
    let ratio_part = (savings_ratio.clamp(0.0, 0.4) / 0.4) * 50.0;
    let stability_part = (income_stability_score.clamp(0.0, 100.0) / 100.0) * 25.0;
    let calm_part = (1.0 - overall_volatility_score.clamp(0.0, 100.0) / 100.0) * 25.0;
    (ratio_part + stability_part + calm_part).clamp(0.0, 100.0)
}
