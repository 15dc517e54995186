//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Arth - Personalized budget recommendations from your own spending
#[derive(Parser)]
#[command(name = "arth")]
#[command(about = "Explainable budget recommendation engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// User id to operate on
    #[arg(long, default_value = "1", global = true)]
    pub user: i64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import transactions from CSV
    Import {
        /// CSV file with columns: date,amount,category,merchant,source[,expense_type]
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Record a single transaction
    Add {
        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Amount spent (rupees, e.g. 450.50)
        #[arg(short, long)]
        amount: String,

        /// Spending category (food, rent, transport, ...)
        #[arg(short, long)]
        category: String,

        /// Merchant name
        #[arg(short, long)]
        merchant: String,

        /// Payment source: upi, bank, card, cash, manual
        #[arg(short, long, default_value = "manual")]
        source: String,

        /// Override classification: fixed, variable_essential, discretionary
        #[arg(long)]
        expense_type: Option<String>,
    },

    /// Show or update the financial profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },

    /// Generate a budget recommendation
    Generate {
        /// Target month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Emit the recommendation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the most recent stored recommendation
    Latest {
        /// Emit the recommendation as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored recommendations, newest first
    Summary,

    /// Compare budgeted vs actual spending per category
    Compare {
        /// Month to compare (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Score how closely spending tracks the current month's budget
    Adherence {
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show database status
    Status,

    /// Manage transactions
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile with its current scores
    Show,

    /// Set monthly income
    SetIncome {
        /// Monthly income in rupees (e.g. 50000)
        income: String,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List recent transactions
    List {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },
}
