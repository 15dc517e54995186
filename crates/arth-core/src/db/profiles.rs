//! Financial profile operations

use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;

use super::{parse_datetime, parse_decimal, Database};
use crate::error::{Error, Result};
use crate::models::{FinancialProfile, ProfileScores};

/// Income assumed for a brand-new profile until the user sets their own
const DEFAULT_MONTHLY_INCOME: &str = "50000.00";
/// A single-income profile starts out assumed fairly stable
const DEFAULT_INCOME_STABILITY: f64 = 85.0;

impl Database {
    /// Fetch a profile, creating it with defaults on first touch
    pub fn get_or_create_profile(&self, user_id: i64) -> Result<FinancialProfile> {
        if let Some(profile) = self.get_profile(user_id)? {
            return Ok(profile);
        }
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO profiles (user_id, monthly_income, income_stability_score)
             VALUES (?, ?, ?)",
            params![user_id, DEFAULT_MONTHLY_INCOME, DEFAULT_INCOME_STABILITY],
        )?;
        self.get_profile(user_id)?
            .ok_or_else(|| Error::NotFound(format!("profile for user {}", user_id)))
    }

    /// Fetch a profile if one exists
    pub fn get_profile(&self, user_id: i64) -> Result<Option<FinancialProfile>> {
        let conn = self.conn()?;
        let profile = conn
            .query_row(
                "SELECT user_id, monthly_income, income_stability_score,
                        expense_volatility_score, savings_confidence_indicator, updated_at
                 FROM profiles WHERE user_id = ?",
                params![user_id],
                |row| {
                    let income_str: String = row.get(1)?;
                    let updated_at_str: String = row.get(5)?;
                    Ok(FinancialProfile {
                        user_id: row.get(0)?,
                        monthly_income: parse_decimal(&income_str),
                        income_stability_score: row.get(2)?,
                        expense_volatility_score: row.get(3)?,
                        savings_confidence_indicator: row.get(4)?,
                        updated_at: parse_datetime(&updated_at_str),
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    /// Update the user's stated monthly income
    pub fn set_monthly_income(&self, user_id: i64, income: Decimal) -> Result<()> {
        if income <= Decimal::ZERO {
            return Err(Error::InvalidProfile(format!(
                "monthly income must be positive, got {}",
                income
            )));
        }
        self.get_or_create_profile(user_id)?;
        let conn = self.conn()?;
        conn.execute(
            "UPDATE profiles SET monthly_income = ?, updated_at = CURRENT_TIMESTAMP
             WHERE user_id = ?",
            params![income.to_string(), user_id],
        )?;
        Ok(())
    }

    /// Persist scores recomputed during generation
    pub fn update_profile_scores(&self, user_id: i64, scores: &ProfileScores) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE profiles
             SET expense_volatility_score = ?,
                 savings_confidence_indicator = ?,
                 updated_at = CURRENT_TIMESTAMP
             WHERE user_id = ?",
            params![
                scores.expense_volatility_score,
                scores.savings_confidence_indicator,
                user_id
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("profile for user {}", user_id)));
        }
        Ok(())
    }
}
