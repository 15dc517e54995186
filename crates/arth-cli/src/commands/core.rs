//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `resolve_db_path` / `open_db` - Shared database utilities
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Show database status

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arth_core::db::Database;

/// Resolve the database path: explicit --db wins, otherwise the
/// platform data directory (~/.local/share/arth/arth.db on Linux)
pub fn resolve_db_path(arg: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = arg {
        return Ok(path.to_path_buf());
    }
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    let dir = base.join("arth");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
    Ok(dir.join("arth.db"))
}

pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path, user_id: i64) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    let profile = db
        .get_or_create_profile(user_id)
        .context("Failed to create profile")?;
    println!(
        "   Created profile for user {} (income ₹{}/month)",
        user_id, profile.monthly_income
    );

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Set your income: arth profile set-income 50000");
    println!("  2. Import transactions: arth import --file statement.csv");
    println!("  3. Generate a budget: arth generate");

    Ok(())
}

pub fn cmd_status(db_path: &Path, user_id: i64) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Arth Status");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
        return Ok(());
    }

    let db = open_db(db_path)?;
    let count = db.transaction_count(user_id)?;
    println!();
    println!("   User: {}", user_id);
    println!("   Transactions: {}", count);

    match db.get_profile(user_id)? {
        Some(profile) => {
            println!("   Monthly income: ₹{}", profile.monthly_income);
        }
        None => {
            println!("   Profile: (not created, run 'arth init')");
        }
    }

    match db.latest_recommendation(user_id)? {
        Some(budget) => {
            println!(
                "   Latest budget: {} (₹{} recommended)",
                budget.month_display, budget.total_recommended_budget
            );
        }
        None => {
            println!("   Latest budget: (none, run 'arth generate')");
        }
    }

    Ok(())
}
