//! Spending pattern analysis
//!
//! Three passes over the lookback window:
//! - aggregation: monthly sums per category, zero-filled inside the window
//! - anomaly filtering: per-transaction outliers excluded from the baseline
//! - volatility: coefficient of variation over monthly sums, mapped to a
//!   risk tier

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::classify;
use crate::dates::{add_months, month_display, month_end, month_index, month_start};
use crate::engine::EngineConfig;
use crate::error::{Error, Result};
use crate::models::{Category, CategoryStat, RiskTier, Transaction};

/// Result of analyzing a user's lookback window
#[derive(Debug, Clone)]
pub struct SpendingAnalysis {
    /// Per-category statistics, ordered by category
    pub stats: Vec<CategoryStat>,
    /// Clamped window size actually used
    pub window_months: u32,
    /// First day of the earliest window month
    pub window_start: NaiveDate,
    /// Last day before the target month
    pub window_end: NaiveDate,
    /// Transactions inside the window (anomalies included)
    pub transaction_count: usize,
    /// Transaction-count-weighted mean cv across categories, scaled to 0-100
    pub overall_volatility_score: f64,
}

/// Population standard deviation; returns (mean, stddev)
fn mean_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Map a coefficient of variation to a risk tier
pub fn risk_tier_for_cv(cv: f64, config: &EngineConfig) -> RiskTier {
    if cv < config.cv_medium_threshold {
        RiskTier::Low
    } else if cv < config.cv_high_threshold {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

/// Flag per-transaction outliers within one category's window.
///
/// A transaction is anomalous when its amount exceeds `mean + k * stddev`
/// of the category's amounts, and the category has at least
/// `anomaly_min_observations` transactions. Below that, no statistical
/// judgment is made and everything is kept.
///
/// Returns (kept, anomalous).
fn split_anomalies<'a>(
    txns: &[&'a Transaction],
    config: &EngineConfig,
) -> (Vec<&'a Transaction>, Vec<&'a Transaction>) {
    if txns.len() < config.anomaly_min_observations {
        return (txns.to_vec(), Vec::new());
    }

    let amounts: Vec<f64> = txns
        .iter()
        .map(|t| t.amount.to_f64().unwrap_or(0.0))
        .collect();
    let (mean, stddev) = mean_stddev(&amounts);
    if stddev <= 0.0 {
        return (txns.to_vec(), Vec::new());
    }

    let threshold = mean + config.anomaly_stddev_factor * stddev;
    let mut kept = Vec::with_capacity(txns.len());
    let mut anomalous = Vec::new();
    for (t, amount) in txns.iter().zip(&amounts) {
        if *amount > threshold {
            anomalous.push(*t);
        } else {
            kept.push(*t);
        }
    }
    (kept, anomalous)
}

/// Sum transactions into per-window-month buckets (zero-filled)
fn monthly_sums(txns: &[&Transaction], window: &[NaiveDate]) -> Vec<Decimal> {
    let mut by_month: BTreeMap<i32, Decimal> =
        window.iter().map(|m| (month_index(*m), Decimal::ZERO)).collect();
    for t in txns {
        if let Some(sum) = by_month.get_mut(&month_index(month_start(t.date))) {
            *sum += t.amount;
        }
    }
    by_month.into_values().collect()
}

/// Analyze a transaction history for the window preceding `target_month`.
///
/// Pure function of its inputs. Fails with [`Error::InsufficientData`] when
/// the window contains no transactions at all; a single sparse category is
/// not an error.
pub fn analyze(
    transactions: &[Transaction],
    target_month: NaiveDate,
    config: &EngineConfig,
) -> Result<SpendingAnalysis> {
    let target = month_start(target_month);

    // Months of history available before the target month, for clamping
    let earliest = transactions
        .iter()
        .filter(|t| t.date < target)
        .map(|t| t.date)
        .min()
        .ok_or_else(|| {
            Error::InsufficientData(format!(
                "no transaction history before {}; add transactions and generate again",
                month_display(target)
            ))
        })?;

    let available = (month_index(target) - month_index(month_start(earliest))).max(1) as u32;
    let window_months = config.lookback_months.max(1).min(available);
    let window: Vec<NaiveDate> = (0..window_months)
        .rev()
        .map(|back| add_months(target, -(back as i32 + 1)))
        .collect();
    let window_start = window[0];
    let window_end = month_end(add_months(target, -1));

    let in_window: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.date >= window_start && t.date < target)
        .collect();
    if in_window.is_empty() {
        return Err(Error::InsufficientData(format!(
            "no transactions in the {}-month window before {}",
            window_months,
            month_display(target)
        )));
    }

    debug!(
        window_months,
        transactions = in_window.len(),
        "analyzing spending window {} to {}",
        window_start,
        window_end
    );

    let mut by_category: BTreeMap<Category, Vec<&Transaction>> = BTreeMap::new();
    for t in &in_window {
        by_category.entry(t.category).or_default().push(t);
    }

    let months = Decimal::from(window_months);
    let mut stats = Vec::with_capacity(by_category.len());
    let mut weighted_cv = 0.0;
    let mut weight_total = 0usize;

    for (category, txns) in &by_category {
        let actual_sums = monthly_sums(txns, &window);
        let actual_total: Decimal = actual_sums.iter().sum();
        if actual_total.is_zero() {
            // No real activity (e.g. zero-amount records); nothing to budget
            continue;
        }

        let (kept, anomalous) = split_anomalies(txns, config);
        let baseline_sums = monthly_sums(&kept, &window);
        let baseline_total: Decimal = baseline_sums.iter().sum();

        let baseline_average = (baseline_total / months).round_dp(2);
        let actual_average = (actual_total / months).round_dp(2);

        // cv over monthly sums needs at least two months in the window;
        // with one month there is no dispersion to measure
        let cv = if window_months >= 2 {
            let sums_f64: Vec<f64> =
                baseline_sums.iter().map(|s| s.to_f64().unwrap_or(0.0)).collect();
            let (mean, stddev) = mean_stddev(&sums_f64);
            if mean > 0.0 {
                stddev / mean
            } else {
                0.0
            }
        } else {
            0.0
        };

        let months_observed = actual_sums.iter().filter(|s| !s.is_zero()).count();
        let classification = classify::classify_category(*category, txns);

        weighted_cv += cv * txns.len() as f64;
        weight_total += txns.len();

        stats.push(CategoryStat {
            category: *category,
            classification,
            baseline_average,
            actual_average,
            coefficient_of_variation: cv,
            risk_tier: risk_tier_for_cv(cv, config),
            anomalies_excluded: anomalous.len(),
            months_observed,
            transaction_count: txns.len(),
        });
    }

    let overall_volatility_score = if weight_total > 0 {
        (weighted_cv / weight_total as f64 * 100.0).min(100.0)
    } else {
        0.0
    };

    Ok(SpendingAnalysis {
        stats,
        window_months,
        window_start,
        window_end,
        transaction_count: in_window.len(),
        overall_volatility_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseClass, TransactionSource};
    use chrono::Utc;
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
            merchant_name: "Test Merchant".to_string(),
            source: TransactionSource::Manual,
            created_at: Utc::now(),
        }
    }

    fn default_config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_empty_window_is_insufficient_data() {
        let err = analyze(&[], d(2026, 9, 1), &default_config()).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn test_history_outside_window_is_insufficient_data() {
        // One transaction a year ago: clamping keeps the 3-month window,
        // which is then empty
        let txns = vec![txn(d(2025, 9, 10), dec!(500), Category::Food)];
        let err = analyze(&txns, d(2026, 9, 1), &default_config()).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn test_baseline_is_mean_of_monthly_sums() {
        let txns = vec![
            txn(d(2026, 6, 5), dec!(6000), Category::Food),
            txn(d(2026, 7, 5), dec!(6200), Category::Food),
            txn(d(2026, 8, 5), dec!(6400), Category::Food),
        ];
        let analysis = analyze(&txns, d(2026, 9, 1), &default_config()).unwrap();
        assert_eq!(analysis.window_months, 3);
        assert_eq!(analysis.stats.len(), 1);
        let food = &analysis.stats[0];
        assert_eq!(food.baseline_average, dec!(6200.00));
        assert_eq!(food.actual_average, dec!(6200.00));
        assert!(food.coefficient_of_variation < 0.10);
        assert_eq!(food.risk_tier, RiskTier::Low);
        assert_eq!(food.months_observed, 3);
    }

    #[test]
    fn test_window_clamps_to_available_history() {
        // Only one month of history: window shrinks to 1 and cv is 0
        let txns = vec![
            txn(d(2026, 8, 3), dec!(1000), Category::Transport),
            txn(d(2026, 8, 20), dec!(1200), Category::Transport),
        ];
        let analysis = analyze(&txns, d(2026, 9, 1), &default_config()).unwrap();
        assert_eq!(analysis.window_months, 1);
        let transport = &analysis.stats[0];
        assert_eq!(transport.baseline_average, dec!(2200.00));
        assert_eq!(transport.coefficient_of_variation, 0.0);
        assert_eq!(transport.risk_tier, RiskTier::Low);
    }

    #[test]
    fn test_missing_month_counts_as_zero() {
        // Active user, but entertainment only in 2 of 3 window months
        let txns = vec![
            txn(d(2026, 6, 5), dec!(3000), Category::Food),
            txn(d(2026, 7, 5), dec!(3000), Category::Food),
            txn(d(2026, 8, 5), dec!(3000), Category::Food),
            txn(d(2026, 6, 9), dec!(900), Category::Entertainment),
            txn(d(2026, 8, 9), dec!(900), Category::Entertainment),
        ];
        let analysis = analyze(&txns, d(2026, 9, 1), &default_config()).unwrap();
        let ent = analysis
            .stats
            .iter()
            .find(|s| s.category == Category::Entertainment)
            .unwrap();
        // (900 + 0 + 900) / 3
        assert_eq!(ent.baseline_average, dec!(600.00));
        assert_eq!(ent.months_observed, 2);
        // An on/off month pattern is genuinely volatile
        assert_eq!(ent.risk_tier, RiskTier::High);
    }

    #[test]
    fn test_anomaly_excluded_from_baseline_but_kept_in_actual() {
        // Ten 500 transactions per month for 3 months, plus one 50000 spike
        let mut txns = Vec::new();
        for month in [6u32, 7, 8] {
            for day in 1..=10 {
                txns.push(txn(d(2026, month, day), dec!(500), Category::Healthcare));
            }
        }
        txns.push(txn(d(2026, 8, 15), dec!(50000), Category::Healthcare));

        let analysis = analyze(&txns, d(2026, 9, 1), &default_config()).unwrap();
        let health = &analysis.stats[0];
        assert_eq!(health.anomalies_excluded, 1);
        assert_eq!(health.baseline_average, dec!(5000.00));
        // (5000 + 5000 + 55000) / 3
        assert_eq!(health.actual_average, dec!(21666.67));
    }

    #[test]
    fn test_small_categories_keep_everything() {
        // 3 observations: below the minimum for statistical judgment
        let txns = vec![
            txn(d(2026, 6, 1), dec!(100), Category::Shopping),
            txn(d(2026, 7, 1), dec!(110), Category::Shopping),
            txn(d(2026, 8, 1), dec!(9000), Category::Shopping),
        ];
        let analysis = analyze(&txns, d(2026, 9, 1), &default_config()).unwrap();
        assert_eq!(analysis.stats[0].anomalies_excluded, 0);
    }

    #[test]
    fn test_cv_monotonic_in_spread() {
        // Same mean, doubled spread: cv must not decrease
        let narrow = vec![
            txn(d(2026, 7, 5), dec!(1800), Category::Travel),
            txn(d(2026, 8, 5), dec!(2200), Category::Travel),
        ];
        let wide = vec![
            txn(d(2026, 7, 5), dec!(1600), Category::Travel),
            txn(d(2026, 8, 5), dec!(2400), Category::Travel),
        ];
        let cfg = default_config();
        let cv_narrow = analyze(&narrow, d(2026, 9, 1), &cfg).unwrap().stats[0]
            .coefficient_of_variation;
        let cv_wide =
            analyze(&wide, d(2026, 9, 1), &cfg).unwrap().stats[0].coefficient_of_variation;
        assert!(cv_wide > cv_narrow);
    }

    #[test]
    fn test_risk_tier_thresholds() {
        let cfg = default_config();
        assert_eq!(risk_tier_for_cv(0.05, &cfg), RiskTier::Low);
        assert_eq!(risk_tier_for_cv(0.10, &cfg), RiskTier::Medium);
        assert_eq!(risk_tier_for_cv(0.24, &cfg), RiskTier::Medium);
        assert_eq!(risk_tier_for_cv(0.25, &cfg), RiskTier::High);
    }

    #[test]
    fn test_stats_ordered_by_category() {
        let txns = vec![
            txn(d(2026, 8, 1), dec!(100), Category::Travel),
            txn(d(2026, 8, 2), dec!(100), Category::Rent),
            txn(d(2026, 8, 3), dec!(100), Category::Food),
        ];
        let analysis = analyze(&txns, d(2026, 9, 1), &default_config()).unwrap();
        let cats: Vec<Category> = analysis.stats.iter().map(|s| s.category).collect();
        let mut sorted = cats.clone();
        sorted.sort();
        assert_eq!(cats, sorted);
    }
}
