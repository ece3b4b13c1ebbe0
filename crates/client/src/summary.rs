//! Dashboard figures derived from an in-memory expense list.
//!
//! Nothing here is stored: every figure is recomputed from the current list.

use std::collections::BTreeMap;

use api_types::expense::{Category, Expense, TransactionKind};

/// How many entries the dashboard shows as recent activity.
pub const RECENT_LIMIT: usize = 5;

fn sum_of(expenses: &[Expense], kind: TransactionKind) -> f64 {
    expenses
        .iter()
        .filter(|e| e.kind == kind)
        .map(|e| e.amount)
        .sum()
}

pub fn total_income(expenses: &[Expense]) -> f64 {
    sum_of(expenses, TransactionKind::Income)
}

pub fn total_expenses(expenses: &[Expense]) -> f64 {
    sum_of(expenses, TransactionKind::Expense)
}

pub fn balance(expenses: &[Expense]) -> f64 {
    total_income(expenses) - total_expenses(expenses)
}

/// The `limit` most recent entries by `date`.
///
/// The sort is stable: entries sharing a date keep their relative order.
pub fn recent_transactions(expenses: &[Expense], limit: usize) -> Vec<Expense> {
    let mut sorted = expenses.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}

/// Sum of expense amounts per category. Income entries are ignored.
pub fn category_totals(expenses: &[Expense]) -> BTreeMap<Category, f64> {
    expenses
        .iter()
        .filter(|e| e.kind == TransactionKind::Expense)
        .fold(BTreeMap::new(), |mut totals, e| {
            *totals.entry(e.category).or_insert(0.0) += e.amount;
            totals
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub recent: Vec<Expense>,
    pub category_totals: BTreeMap<Category, f64>,
}

impl Summary {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let total_income = total_income(expenses);
        let total_expenses = total_expenses(expenses);
        Self {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            recent: recent_transactions(expenses, RECENT_LIMIT),
            category_totals: category_totals(expenses),
        }
    }
}
