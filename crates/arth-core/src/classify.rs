//! Expense classification
//!
//! Categories map to a spending class through a data table, so policy
//! changes are a table edit rather than a code change. A per-transaction
//! `expense_type` override wins over the table for that transaction's
//! vote; the majority class across a category's transactions decides the
//! category's classification.

use crate::models::{Category, ExpenseClass, Transaction};

/// Default classification per category
const CLASSIFICATION_TABLE: [(Category, ExpenseClass); 15] = [
    (Category::Rent, ExpenseClass::Fixed),
    (Category::Emi, ExpenseClass::Fixed),
    (Category::Subscriptions, ExpenseClass::Fixed),
    (Category::Insurance, ExpenseClass::Fixed),
    (Category::Food, ExpenseClass::VariableEssential),
    (Category::Transport, ExpenseClass::VariableEssential),
    (Category::Utilities, ExpenseClass::VariableEssential),
    (Category::Groceries, ExpenseClass::VariableEssential),
    (Category::Healthcare, ExpenseClass::VariableEssential),
    (Category::Education, ExpenseClass::VariableEssential),
    (Category::Entertainment, ExpenseClass::Discretionary),
    (Category::Shopping, ExpenseClass::Discretionary),
    (Category::DiningOut, ExpenseClass::Discretionary),
    (Category::Travel, ExpenseClass::Discretionary),
    (Category::Other, ExpenseClass::Discretionary),
];

/// Table lookup without any transaction context
pub fn default_class(category: Category) -> ExpenseClass {
    CLASSIFICATION_TABLE
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, class)| *class)
        .unwrap_or(ExpenseClass::Discretionary)
}

/// Classify a category from its transactions.
///
/// Each transaction votes with its `expense_type` override when present,
/// otherwise with the table default. Ties fall back to the table default,
/// which keeps classification deterministic for the same transaction mix.
pub fn classify_category(category: Category, transactions: &[&Transaction]) -> ExpenseClass {
    let table = default_class(category);
    if transactions.is_empty() {
        return table;
    }

    // Index by ExpenseClass::index(): fixed, variable_essential, discretionary
    let mut votes = [0usize; 3];
    for t in transactions {
        let class = t.expense_type.unwrap_or(table);
        votes[class.index()] += 1;
    }

    let max = *votes.iter().max().unwrap_or(&0);
    let winners: Vec<ExpenseClass> = [
        ExpenseClass::Fixed,
        ExpenseClass::VariableEssential,
        ExpenseClass::Discretionary,
    ]
    .into_iter()
    .filter(|c| votes[c.index()] == max)
    .collect();

    if winners.len() == 1 {
        winners[0]
    } else if winners.contains(&table) {
        table
    } else {
        winners[0]
    }
}
