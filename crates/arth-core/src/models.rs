//! Domain models for Arth

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Spending categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Rent,
    Emi,
    Subscriptions,
    Insurance,
    Food,
    Transport,
    Utilities,
    Groceries,
    Entertainment,
    Shopping,
    DiningOut,
    Travel,
    Healthcare,
    Education,
    Other,
}

impl Category {
    pub const ALL: [Category; 15] = [
        Self::Rent,
        Self::Emi,
        Self::Subscriptions,
        Self::Insurance,
        Self::Food,
        Self::Transport,
        Self::Utilities,
        Self::Groceries,
        Self::Entertainment,
        Self::Shopping,
        Self::DiningOut,
        Self::Travel,
        Self::Healthcare,
        Self::Education,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Emi => "emi",
            Self::Subscriptions => "subscriptions",
            Self::Insurance => "insurance",
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Utilities => "utilities",
            Self::Groceries => "groceries",
            Self::Entertainment => "entertainment",
            Self::Shopping => "shopping",
            Self::DiningOut => "dining_out",
            Self::Travel => "travel",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Other => "other",
        }
    }

    /// Human-readable name used for `category_display` in output contracts
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Rent => "Rent",
            Self::Emi => "EMI",
            Self::Subscriptions => "Subscriptions",
            Self::Insurance => "Insurance",
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Utilities => "Bills & Utilities",
            Self::Groceries => "Groceries",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::DiningOut => "Dining Out",
            Self::Travel => "Travel",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rent" => Ok(Self::Rent),
            "emi" => Ok(Self::Emi),
            "subscriptions" => Ok(Self::Subscriptions),
            "insurance" => Ok(Self::Insurance),
            "food" => Ok(Self::Food),
            "transport" => Ok(Self::Transport),
            "utilities" | "bills" => Ok(Self::Utilities),
            "groceries" => Ok(Self::Groceries),
            "entertainment" => Ok(Self::Entertainment),
            "shopping" => Ok(Self::Shopping),
            "dining_out" | "dining-out" | "dining" => Ok(Self::DiningOut),
            "travel" => Ok(Self::Travel),
            "healthcare" => Ok(Self::Healthcare),
            "education" => Ok(Self::Education),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending class a category falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseClass {
    /// Recurring, largely invariant obligation (rent, EMI)
    Fixed,
    /// Necessary but fluctuating spend (food, transport)
    VariableEssential,
    /// Optional spend (entertainment, shopping)
    Discretionary,
}

impl ExpenseClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::VariableEssential => "variable_essential",
            Self::Discretionary => "discretionary",
        }
    }

    /// Row index into policy tables
    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Fixed => 0,
            Self::VariableEssential => 1,
            Self::Discretionary => 2,
        }
    }
}

impl std::str::FromStr for ExpenseClass {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "variable_essential" | "variable-essential" => Ok(Self::VariableEssential),
            "discretionary" => Ok(Self::Discretionary),
            _ => Err(format!("Unknown expense class: {}", s)),
        }
    }
}

impl std::fmt::Display for ExpenseClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Volatility risk tier derived from a category's coefficient of variation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Column index into policy tables
    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

impl std::str::FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown risk tier: {}", s)),
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction source - how the money moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSource {
    Upi,
    Bank,
    Card,
    Cash,
    #[default]
    Manual,
}

impl TransactionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upi => "upi",
            Self::Bank => "bank",
            Self::Card => "card",
            Self::Cash => "cash",
            Self::Manual => "manual",
        }
    }
}

impl std::str::FromStr for TransactionSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upi" => Ok(Self::Upi),
            "bank" | "bank_transfer" => Ok(Self::Bank),
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("Unknown transaction source: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An individual expense record. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: Category,
    /// Explicit classification override; wins over the category table
    /// for this transaction's vote
    pub expense_type: Option<ExpenseClass>,
    pub merchant_name: String,
    pub source: TransactionSource,
    pub created_at: DateTime<Utc>,
}

/// A transaction ready for insertion (no id yet)
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: Category,
    pub expense_type: Option<ExpenseClass>,
    pub merchant_name: String,
    pub source: TransactionSource,
    /// Content hash for deduplication on re-import
    pub import_hash: String,
}

/// A user's financial profile with income and derived health scores.
/// One per user; scores are recomputed on every generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub user_id: i64,
    pub monthly_income: Decimal,
    /// 0-100, higher = steadier income
    pub income_stability_score: f64,
    /// 0-100, higher = more volatile spending
    pub expense_volatility_score: f64,
    /// 0-100, higher = savings target more likely to be met
    pub savings_confidence_indicator: f64,
    pub updated_at: DateTime<Utc>,
}

/// Per-category statistics computed fresh on every generation call.
/// Engine-internal; discarded after assembly into a recommendation.
#[derive(Debug, Clone)]
pub struct CategoryStat {
    pub category: Category,
    pub classification: ExpenseClass,
    /// Mean of monthly sums over the lookback window, anomalies excluded
    pub baseline_average: Decimal,
    /// Mean of monthly sums with anomalies retained
    pub actual_average: Decimal,
    pub coefficient_of_variation: f64,
    pub risk_tier: RiskTier,
    pub anomalies_excluded: usize,
    /// Window months where this category had any activity
    pub months_observed: usize,
    pub transaction_count: usize,
}

/// Category-level line of a budget recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub category: Category,
    pub category_display: String,
    pub recommended_limit: Decimal,
    pub actual_average: Decimal,
    /// recommended_limit - actual_average (can be negative)
    pub variance: Decimal,
    pub risk_level: RiskTier,
    pub reason: String,
}

/// Weekly slice of the month's total recommended budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyBudget {
    pub week_number: u32,
    pub week_start_date: NaiveDate,
    pub week_end_date: NaiveDate,
    pub recommended_weekly_spending: Decimal,
    pub explanation: String,
}

/// A full budget recommendation for one month.
/// The canonical latest per (user, month); regeneration replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRecommendation {
    /// First day of the target month
    pub month: NaiveDate,
    /// e.g. "September 2026"
    pub month_display: String,
    pub total_recommended_budget: Decimal,
    pub recommended_savings: Decimal,
    pub savings_reason: String,
    pub category_budgets: Vec<CategoryBudget>,
    pub weekly_budgets: Vec<WeeklyBudget>,
    pub generated_at: DateTime<Utc>,
}

/// Profile scores recomputed alongside a recommendation.
/// The caller persists these onto the user's profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProfileScores {
    pub expense_volatility_score: f64,
    pub savings_confidence_indicator: f64,
}

/// Severity of a category adherence insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Success,
    Warning,
    Critical,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    /// Sort key: critical first, success last
    pub(crate) fn severity(&self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Warning => 1,
            Self::Success => 2,
        }
    }
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One category's adherence verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInsight {
    pub category: Category,
    pub category_display: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub message: String,
}

/// How closely actual spending tracked a stored recommendation.
/// Computed on demand, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdherenceResult {
    /// 0-100
    pub score: f64,
    pub message: String,
    pub total_budgeted: Decimal,
    pub total_spent: Decimal,
    pub category_insights: Vec<CategoryInsight>,
}

/// Category-level budget vs actual comparison row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryComparison {
    pub category: Category,
    pub category_display: String,
    pub budgeted: Decimal,
    pub actual: Decimal,
    /// budgeted - actual (negative = overspent)
    pub difference: Decimal,
    pub percentage_used: f64,
    pub over_budget: bool,
}

/// One row of the recent-recommendations summary listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSummaryRow {
    pub month: NaiveDate,
    pub month_display: String,
    pub total_recommended_budget: Decimal,
    pub recommended_savings: Decimal,
    pub generated_at: DateTime<Utc>,
}
