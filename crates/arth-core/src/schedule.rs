//! Weekly budget scheduling
//!
//! The target month is cut into 7-day chunks anchored at the 1st; the
//! final chunk is whatever remains (1-7 days), so a 31-day month yields
//! five weeks and a 28-day February four. Each week's target is the
//! month total scaled by its share of days, rounded to the minor unit,
//! with the last week absorbing the rounding residue so the weekly
//! amounts sum exactly to the month total.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::dates::{days_in_month, month_end, month_start};
use crate::explain;
use crate::models::WeeklyBudget;

/// Split a month's recommended total into weekly targets
pub fn weekly_budgets(target_month: NaiveDate, month_total: Decimal) -> Vec<WeeklyBudget> {
    let first = month_start(target_month);
    let last = month_end(target_month);
    let total_days = days_in_month(first);

    // 7-day chunks, final partial chunk included
    let mut spans = Vec::new();
    let mut start = first;
    while start <= last {
        let end = (start + Duration::days(6)).min(last);
        spans.push((start, end));
        start = end + Duration::days(1);
    }
    let total_weeks = spans.len() as u32;

    let mut budgets = Vec::with_capacity(spans.len());
    let mut allocated = Decimal::ZERO;
    for (i, (week_start, week_end)) in spans.iter().enumerate() {
        let week_number = i as u32 + 1;
        let days = (week_end.signed_duration_since(*week_start).num_days() + 1) as u32;

        let amount = if week_number == total_weeks {
            // Last week takes the remainder so the sum is exact
            month_total - allocated
        } else {
            (month_total * Decimal::from(days) / Decimal::from(total_days)).round_dp(2)
        };
        allocated += amount;

        budgets.push(WeeklyBudget {
            week_number,
            week_start_date: *week_start,
            week_end_date: *week_end,
            recommended_weekly_spending: amount,
            explanation: explain::weekly_explanation(
                week_number,
                total_weeks,
                days,
                total_days,
                amount,
                month_total,
            ),
        });
    }

    budgets
}
