//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `adherence` - Adherence scoring and budget-vs-actual comparison
//! - `budget` - Generate/latest/summary commands
//! - `core` - Core commands (init, status) and shared utilities (open_db)
//! - `import` - CSV import and manual transaction entry
//! - `profile` - Financial profile commands
//! - `transactions` - Transaction listing

pub mod adherence;
pub mod budget;
pub mod core;
pub mod import;
pub mod profile;
pub mod transactions;

// Re-export command functions for main.rs
pub use adherence::*;
pub use budget::*;
pub use core::*;
pub use import::*;
pub use profile::*;
pub use transactions::*;

use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate, Utc};

/// Truncate a string to a maximum number of characters, adding "..."
/// if truncated. Counts chars, not bytes, so multibyte merchant names
/// never split mid-character.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Resolve an optional YYYY-MM argument to the first of that month,
/// defaulting to the current month
pub fn resolve_month(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(s) => {
            let full = format!("{}-01", s);
            NaiveDate::parse_from_str(&full, "%Y-%m-%d")
                .map_err(|_| anyhow!("Invalid --month format: {} (use YYYY-MM)", s))
        }
        None => {
            let today = Utc::now().date_naive();
            NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
                .ok_or_else(|| anyhow!("Could not compute current month"))
        }
    }
}
