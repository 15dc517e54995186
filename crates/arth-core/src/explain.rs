//! Explanation generation
//!
//! Every numeric decision gets a templated sentence built only from the
//! facts it cites. No sentence asserts a fixed rule ("always save 20%");
//! each references the user's own computed statistics.

use rust_decimal::Decimal;

use crate::models::{CategoryStat, ExpenseClass, InsightType, RiskTier};

/// Format an amount as rupees, whole units with thousand separators
pub fn inr(amount: Decimal) -> String {
    let rounded = amount.round();
    let negative = rounded.is_sign_negative();
    let digits = rounded.abs().to_string();
    let whole = digits.split('.').next().unwrap_or("0");

    let mut grouped = String::new();
    for (i, c) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();
    if negative {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

/// Reason line for one category budget.
///
/// Cites the baseline average and the applied percentage, plus any
/// anomaly exclusion or short-history caveat that shaped the number.
pub fn category_reason(
    stat: &CategoryStat,
    buffer_percent: i64,
    limit: Decimal,
    window_months: u32,
) -> String {
    let name = stat.category.display_name();
    let baseline = inr(stat.baseline_average);
    let cv_pct = stat.coefficient_of_variation * 100.0;

    let mut reason = match (stat.classification, stat.risk_tier) {
        (ExpenseClass::Fixed, _) => format!(
            "{} is a fixed commitment averaging {}/month; a {}% buffer covers billing drift, for a limit of {}.",
            name, baseline, buffer_percent, inr(limit)
        ),
        (ExpenseClass::Discretionary, RiskTier::High) => format!(
            "{} spending is highly irregular (cv {:.1}%); recommending {}, {}% below your {} average, to bring it under control.",
            name,
            cv_pct,
            inr(limit),
            buffer_percent.abs(),
            baseline
        ),
        (_, RiskTier::Low) => format!(
            "{} spending is stable at {}/month (cv {:.1}%); a {}% buffer covers minor fluctuations, for a limit of {}.",
            name, baseline, cv_pct, buffer_percent, inr(limit)
        ),
        (_, RiskTier::Medium) => format!(
            "{} varies moderately month to month (cv {:.1}%); recommending {} with a {}% safety buffer over the {} baseline.",
            name,
            cv_pct,
            inr(limit),
            buffer_percent,
            baseline
        ),
        (_, RiskTier::High) => format!(
            "{} spending swings widely (cv {:.1}%); a {}% buffer over the {} baseline gives a limit of {}.",
            name,
            cv_pct,
            buffer_percent,
            baseline,
            inr(limit)
        ),
    };

    if stat.anomalies_excluded > 0 {
        let plural = if stat.anomalies_excluded == 1 {
            "transaction was"
        } else {
            "transactions were"
        };
        reason.push_str(&format!(
            " {} unusually large {} excluded from the baseline; your unfiltered average is {}.",
            stat.anomalies_excluded,
            plural,
            inr(stat.actual_average)
        ));
    }

    if window_months == 1 {
        reason.push_str(" Based on a single month of history, so confidence is reduced.");
    } else if stat.transaction_count == 1 {
        reason.push_str(" Based on a single transaction, so confidence is reduced.");
    }

    reason
}

/// Reason line for the month's savings target
pub fn savings_reason(
    savings: Decimal,
    monthly_income: Decimal,
    total_recommended: Decimal,
    savings_ratio: f64,
    overall_volatility_score: f64,
    constrained: bool,
) -> String {
    let pct_of_income = savings_ratio * 100.0;

    if constrained {
        return format!(
            "Savings are limited this month: recommended spending of {} leaves {} of your {} income ({:.1}%), mostly due to higher fixed commitments.",
            inr(total_recommended),
            inr(savings),
            inr(monthly_income),
            pct_of_income
        );
    }

    if overall_volatility_score < 20.0 {
        format!(
            "You can comfortably set aside {} ({:.1}% of income); your spending volatility is low ({:.0}/100), which makes this achievable.",
            inr(savings),
            pct_of_income,
            overall_volatility_score
        )
    } else if overall_volatility_score < 40.0 {
        format!(
            "Set aside {} ({:.1}% of income); moderate spending volatility ({:.0}/100) argues for keeping some buffer.",
            inr(savings),
            pct_of_income,
            overall_volatility_score
        )
    } else {
        format!(
            "A conservative target of {} ({:.1}% of income) given high spending volatility ({:.0}/100); stabilizing expenses first will let this grow.",
            inr(savings),
            pct_of_income,
            overall_volatility_score
        )
    }
}

/// Explanation for one weekly slice of the budget
pub fn weekly_explanation(
    week_number: u32,
    total_weeks: u32,
    days_in_week: u32,
    days_in_month: u32,
    amount: Decimal,
    month_total: Decimal,
) -> String {
    let mut text = format!(
        "Week {} carries {} of the month's {}, proportional to its {} of {} days.",
        week_number,
        inr(amount),
        inr(month_total),
        days_in_week,
        days_in_month
    );
    if week_number == 1 {
        text.push_str(" Start strong.");
    } else if week_number == total_weeks {
        text.push_str(" Final week, stay on track.");
    }
    text
}

/// Per-category adherence insight line
pub fn adherence_insight(
    category_display: &str,
    insight_type: InsightType,
    percentage_used: f64,
    limit: Decimal,
) -> String {
    match insight_type {
        InsightType::Success => format!(
            "Great job on {}: {:.0}% of the {} limit used.",
            category_display,
            percentage_used,
            inr(limit)
        ),
        InsightType::Warning => format!(
            "{}: {:.0}% of the {} limit used. Stay mindful.",
            category_display,
            percentage_used,
            inr(limit)
        ),
        InsightType::Critical => format!(
            "{}: {:.0}% over the {} limit.",
            category_display,
            percentage_used - 100.0,
            inr(limit)
        ),
    }
}

/// Overall adherence headline by score band
pub fn adherence_message(score: f64) -> String {
    if score >= 90.0 {
        "Excellent! Spending is tracking the plan closely.".to_string()
    } else if score >= 70.0 {
        "Good job. Minor adjustments recommended.".to_string()
    } else if score >= 50.0 {
        "Caution: several categories need attention.".to_string()
    } else {
        "Alert: significant budget overruns detected.".to_string()
    }
}
