//! Calendar helpers for month-oriented budget math

use chrono::{Datelike, NaiveDate};

/// Normalize a date to the first day of its month
pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .unwrap_or(date)
}

/// Shift a month-start date by a number of calendar months
pub fn add_months(month: NaiveDate, delta: i32) -> NaiveDate {
    let idx = month.year() * 12 + month.month0() as i32 + delta;
    let year = idx.div_euclid(12);
    let month0 = idx.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(month)
}

/// Zero-based month counter, for distances between months
pub fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Number of days in the month containing `month`
pub fn days_in_month(month: NaiveDate) -> u32 {
    let next = add_months(month_start(month), 1);
    next.signed_duration_since(month_start(month)).num_days() as u32
}

/// Last day of the month containing `month`
pub fn month_end(month: NaiveDate) -> NaiveDate {
    add_months(month_start(month), 1).pred_opt().unwrap_or(month)
}

/// "September 2026" style label
pub fn month_display(month: NaiveDate) -> String {
    month.format("%B %Y").to_string()
}
