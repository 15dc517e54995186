//! Arth Core Library
//!
//! Shared functionality for the Arth budget recommendation tool:
//! - Spending pattern analysis over a lookback window (aggregation,
//!   anomaly filtering, volatility)
//! - Expense classification and buffer policy tables
//! - Savings planning and weekly scheduling
//! - Explanation generation for every numeric decision
//! - Adherence scoring against a stored recommendation
//! - CSV import for transaction history
//! - SQLite storage for transactions, profiles, and recommendations

pub mod adherence;
pub mod classify;
pub mod dates;
pub mod db;
pub mod engine;
pub mod error;
pub mod explain;
pub mod import;
pub mod models;
pub mod policy;
pub mod schedule;
pub mod stats;

pub use adherence::{compare_budget_vs_actual, score_adherence};
pub use db::{Database, ImportStats};
pub use engine::{BudgetEngine, EngineConfig};
pub use error::{Error, Result};
pub use models::{
    AdherenceResult, BudgetRecommendation, BudgetSummaryRow, Category, CategoryBudget,
    CategoryComparison, CategoryInsight, CategoryStat, ExpenseClass, FinancialProfile,
    InsightType, NewTransaction, ProfileScores, RiskTier, Transaction, TransactionSource,
    WeeklyBudget,
};
pub use stats::SpendingAnalysis;
