//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use arth_core::db::Database;
use arth_core::import::import_hash;
use arth_core::models::{Category, NewTransaction, TransactionSource};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.get_or_create_profile(1).unwrap();
    db
}

fn insert_test_transaction(
    db: &Database,
    date: NaiveDate,
    amount: Decimal,
    category: Category,
    merchant: &str,
) {
    let tx = NewTransaction {
        date,
        amount,
        category,
        expense_type: None,
        merchant_name: merchant.to_string(),
        source: TransactionSource::Upi,
        import_hash: import_hash(&date, merchant, &amount, category),
    };
    assert!(db.insert_transaction(1, &tx).unwrap());
}

/// Three months of history ending the month before `target`
fn seed_history(db: &Database, target: NaiveDate) {
    for back in 1..=3 {
        let month = arth_core::dates::add_months(target, -back);
        insert_test_transaction(db, month, dec!(6000), Category::Food, "Big Bazaar");
        insert_test_transaction(db, month, dec!(25000), Category::Rent, "Landlord");
    }
}

// ========== Month Resolution Tests ==========

#[test]
fn test_resolve_month_explicit() {
    let month = commands::resolve_month(Some("2026-09")).unwrap();
    assert_eq!(month, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
}

#[test]
fn test_resolve_month_default_is_current() {
    let month = commands::resolve_month(None).unwrap();
    let today = Utc::now().date_naive();
    assert_eq!(month.year(), today.year());
    assert_eq!(month.month(), today.month());
    assert_eq!(month.day(), 1);
}

#[test]
fn test_resolve_month_invalid() {
    let result = commands::resolve_month(Some("September"));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("YYYY-MM"));
}

// ========== Import Tests ==========

#[test]
fn test_cmd_import_csv() {
    use std::io::Write;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("statement.csv");
    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "date,amount,category,merchant,source,expense_type").unwrap();
    writeln!(file, "2026-08-05,6400,food,Big Bazaar,upi,").unwrap();
    writeln!(file, "2026-08-01,25000,rent,Landlord,bank,").unwrap();
    drop(file);

    let db = setup_test_db();
    let result = commands::cmd_import(&db, 1, &csv_path);
    assert!(result.is_ok());
    assert_eq!(db.transaction_count(1).unwrap(), 2);

    // Re-import skips duplicates
    commands::cmd_import(&db, 1, &csv_path).unwrap();
    assert_eq!(db.transaction_count(1).unwrap(), 2);
}

#[test]
fn test_cmd_import_missing_file() {
    let db = setup_test_db();
    let result = commands::cmd_import(&db, 1, std::path::Path::new("/nonexistent.csv"));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Failed to open"));
}

#[test]
fn test_cmd_add() {
    let db = setup_test_db();
    let result = commands::cmd_add(
        &db,
        1,
        Some("2026-08-10"),
        "450.50",
        "dining_out",
        "Cafe Coffee Day",
        "upi",
        None,
    );
    assert!(result.is_ok());
    assert_eq!(db.transaction_count(1).unwrap(), 1);

    let txns = db.all_transactions(1).unwrap();
    assert_eq!(txns[0].amount, dec!(450.50));
    assert_eq!(txns[0].category, Category::DiningOut);
}

#[test]
fn test_cmd_add_duplicate_is_noop() {
    let db = setup_test_db();
    for _ in 0..2 {
        commands::cmd_add(
            &db,
            1,
            Some("2026-08-10"),
            "450.50",
            "food",
            "Cafe",
            "upi",
            None,
        )
        .unwrap();
    }
    assert_eq!(db.transaction_count(1).unwrap(), 1);
}

#[test]
fn test_cmd_add_rejects_bad_input() {
    let db = setup_test_db();

    let result = commands::cmd_add(&db, 1, None, "-50", "food", "Cafe", "upi", None);
    assert!(result.is_err());

    let result = commands::cmd_add(&db, 1, None, "50", "nonsense", "Cafe", "upi", None);
    assert!(result.is_err());

    let result = commands::cmd_add(&db, 1, Some("10-08-2026"), "50", "food", "Cafe", "upi", None);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("YYYY-MM-DD"));
}

#[test]
fn test_cmd_add_with_expense_type_override() {
    let db = setup_test_db();
    commands::cmd_add(
        &db,
        1,
        Some("2026-08-10"),
        "999",
        "subscriptions",
        "Netflix",
        "card",
        Some("discretionary"),
    )
    .unwrap();

    let txns = db.all_transactions(1).unwrap();
    assert_eq!(
        txns[0].expense_type,
        Some(arth_core::models::ExpenseClass::Discretionary)
    );
}

// ========== Profile Tests ==========

#[test]
fn test_cmd_profile_show() {
    let db = setup_test_db();
    let result = commands::cmd_profile_show(&db, 1);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_profile_set_income() {
    let db = setup_test_db();
    let result = commands::cmd_profile_set_income(&db, 1, "75000");
    assert!(result.is_ok());

    let profile = db.get_profile(1).unwrap().unwrap();
    assert_eq!(profile.monthly_income, dec!(75000));
}

#[test]
fn test_cmd_profile_set_income_rejects_invalid() {
    let db = setup_test_db();
    assert!(commands::cmd_profile_set_income(&db, 1, "lots").is_err());
    assert!(commands::cmd_profile_set_income(&db, 1, "0").is_err());
    assert!(commands::cmd_profile_set_income(&db, 1, "-100").is_err());
}

// ========== Generate / Latest / Summary Tests ==========

#[test]
fn test_cmd_generate_and_latest() {
    let db = setup_test_db();
    let target = commands::resolve_month(Some("2026-09")).unwrap();
    seed_history(&db, target);

    let result = commands::cmd_generate(&db, 1, Some("2026-09"), false);
    assert!(result.is_ok());

    let stored = db.latest_recommendation(1).unwrap().unwrap();
    assert_eq!(stored.month, target);
    assert_eq!(stored.category_budgets.len(), 2);

    let result = commands::cmd_latest(&db, 1, false);
    assert!(result.is_ok());

    let result = commands::cmd_latest(&db, 1, true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_generate_json() {
    let db = setup_test_db();
    let target = commands::resolve_month(Some("2026-09")).unwrap();
    seed_history(&db, target);

    let result = commands::cmd_generate(&db, 1, Some("2026-09"), true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_generate_no_history_fails() {
    let db = setup_test_db();
    let result = commands::cmd_generate(&db, 1, Some("2026-09"), false);
    assert!(result.is_err());
    assert!(db.latest_recommendation(1).unwrap().is_none());
}

#[test]
fn test_cmd_generate_updates_profile_scores() {
    let db = setup_test_db();
    let target = commands::resolve_month(Some("2026-09")).unwrap();
    seed_history(&db, target);

    commands::cmd_generate(&db, 1, Some("2026-09"), false).unwrap();

    let profile = db.get_profile(1).unwrap().unwrap();
    assert!(profile.savings_confidence_indicator > 0.0);
}

#[test]
fn test_cmd_latest_empty() {
    let db = setup_test_db();
    let result = commands::cmd_latest(&db, 1, false);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_summary() {
    let db = setup_test_db();
    let result = commands::cmd_summary(&db, 1);
    assert!(result.is_ok());

    let target = commands::resolve_month(Some("2026-09")).unwrap();
    seed_history(&db, target);
    commands::cmd_generate(&db, 1, Some("2026-09"), false).unwrap();
    commands::cmd_generate(&db, 1, Some("2026-10"), false).unwrap();

    let rows = db.recommendation_summary(1, 12).unwrap();
    assert_eq!(rows.len(), 2);

    let result = commands::cmd_summary(&db, 1);
    assert!(result.is_ok());
}

// ========== Compare / Adherence Tests ==========

#[test]
fn test_cmd_compare() {
    let db = setup_test_db();
    let target = commands::resolve_month(Some("2026-09")).unwrap();
    seed_history(&db, target);
    commands::cmd_generate(&db, 1, Some("2026-09"), false).unwrap();

    insert_test_transaction(
        &db,
        NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
        dec!(3000),
        Category::Food,
        "Big Bazaar",
    );

    let result = commands::cmd_compare(&db, 1, Some("2026-09"));
    assert!(result.is_ok());
}

#[test]
fn test_cmd_compare_no_budget() {
    let db = setup_test_db();
    let result = commands::cmd_compare(&db, 1, Some("2026-09"));
    assert!(result.is_err());
}

#[test]
fn test_cmd_adherence() {
    let db = setup_test_db();
    // Adherence is keyed to the current month, so generate for it
    let current = commands::resolve_month(None).unwrap();
    seed_history(&db, current);
    commands::cmd_generate(&db, 1, None, false).unwrap();

    let result = commands::cmd_adherence(&db, 1, false);
    assert!(result.is_ok());

    let result = commands::cmd_adherence(&db, 1, true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_adherence_no_budget() {
    let db = setup_test_db();
    let result = commands::cmd_adherence(&db, 1, false);
    assert!(result.is_ok());
}

#[test]
fn test_adherence_ignores_stale_month_budget() {
    let db = setup_test_db();
    // Only a long-past month has a budget; the current month has none
    let stale = commands::resolve_month(Some("2024-01")).unwrap();
    seed_history(&db, stale);
    commands::cmd_generate(&db, 1, Some("2024-01"), false).unwrap();

    let current = commands::resolve_month(None).unwrap();
    let found = commands::adherence::budget_for_month(&db, 1, current).unwrap();
    assert!(found.is_none(), "stale budget must not stand in for the current month");

    let found = commands::adherence::budget_for_month(&db, 1, stale).unwrap();
    assert_eq!(found.unwrap().month, stale);

    // The command takes the "generate a budget first" path, not a score
    let result = commands::cmd_adherence(&db, 1, false);
    assert!(result.is_ok());
}

// ========== Core Command Tests ==========

#[test]
fn test_cmd_init() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    let result = commands::cmd_init(&db_path, 1);
    assert!(result.is_ok());
    assert!(db_path.exists());

    let db = commands::open_db(&db_path).unwrap();
    assert!(db.get_profile(1).unwrap().is_some());
}

#[test]
fn test_cmd_status() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    // Status on non-existent db
    let result = commands::cmd_status(&db_path, 1);
    assert!(result.is_ok());

    commands::cmd_init(&db_path, 1).unwrap();

    // Status on existing db
    let result = commands::cmd_status(&db_path, 1);
    assert!(result.is_ok());
}

#[test]
fn test_resolve_db_path_explicit() {
    let path = commands::resolve_db_path(Some(std::path::Path::new("/tmp/custom.db"))).unwrap();
    assert_eq!(path, std::path::PathBuf::from("/tmp/custom.db"));
}

// ========== Transaction List Tests ==========

#[test]
fn test_cmd_transactions_empty() {
    let db = setup_test_db();
    let result = commands::cmd_transactions_list(&db, 1, 10);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_transactions_with_data() {
    let db = setup_test_db();
    insert_test_transaction(
        &db,
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
        dec!(6400),
        Category::Food,
        "Big Bazaar",
    );

    let result = commands::cmd_transactions_list(&db, 1, 10);
    assert!(result.is_ok());
}

// ========== Helper Function Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a long string that exceeds", 10), "a long ...");
    assert_eq!(truncate("exact", 5), "exact");
}

#[test]
fn test_truncate_multibyte_merchant_names() {
    // Devanagari and accented names must cut on char boundaries
    assert_eq!(truncate("चाय की दुकान मुंबई", 10), "चाय की ...");
    assert_eq!(truncate("café corner déjà", 10), "café co...");
    assert_eq!(truncate("चाय", 10), "चाय");
}
