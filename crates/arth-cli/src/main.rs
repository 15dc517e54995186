//! Arth CLI - Explainable budget recommendations
//!
//! Usage:
//!   arth init                  Initialize database
//!   arth import --file CSV     Import transactions
//!   arth generate              Generate this month's budget
//!   arth adherence             Check spending against the budget

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db_path = commands::resolve_db_path(cli.db.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path, cli.user),
        Commands::Import { file } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_import(&db, cli.user, &file)
        }
        Commands::Add {
            date,
            amount,
            category,
            merchant,
            source,
            expense_type,
        } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_add(
                &db,
                cli.user,
                date.as_deref(),
                &amount,
                &category,
                &merchant,
                &source,
                expense_type.as_deref(),
            )
        }
        Commands::Profile { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                None | Some(ProfileAction::Show) => commands::cmd_profile_show(&db, cli.user),
                Some(ProfileAction::SetIncome { income }) => {
                    commands::cmd_profile_set_income(&db, cli.user, &income)
                }
            }
        }
        Commands::Generate { month, json } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_generate(&db, cli.user, month.as_deref(), json)
        }
        Commands::Latest { json } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_latest(&db, cli.user, json)
        }
        Commands::Summary => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_summary(&db, cli.user)
        }
        Commands::Compare { month } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_compare(&db, cli.user, month.as_deref())
        }
        Commands::Adherence { json } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_adherence(&db, cli.user, json)
        }
        Commands::Status => commands::cmd_status(&db_path, cli.user),
        Commands::Transactions { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                None => commands::cmd_transactions_list(&db, cli.user, 20),
                Some(TransactionsAction::List { limit }) => {
                    commands::cmd_transactions_list(&db, cli.user, limit)
                }
            }
        }
    }
}
