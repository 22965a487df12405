//! Folds a set of transactions into the dashboard totals.
//!
//! Sums are plain `f64` additions. Nothing is rounded here, rounding to two
//! decimals is left to whoever displays the numbers.

use serde::Serialize;

use crate::transaction::{TransactionRecord, TransactionType};

/// The maximum number of transactions in [AggregationResult::recent].
pub const RECENT_LIMIT: usize = 5;

/// The income and expense sub-totals of a single category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotals {
    /// The category name as it appears on the records.
    pub category: String,
    /// The sum of income in this category.
    pub income: f64,
    /// The sum of expenses in this category.
    pub expense: f64,
}

/// Per-category sub-totals, in the order each category was first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategoryBreakdown(Vec<CategoryTotals>);

impl CategoryBreakdown {
    /// Add `transaction`'s value to its category, creating the entry on first sight.
    fn add(&mut self, transaction: &TransactionRecord) {
        let index = match self
            .0
            .iter()
            .position(|totals| totals.category == transaction.category)
        {
            Some(index) => index,
            None => {
                self.0.push(CategoryTotals {
                    category: transaction.category.clone(),
                    income: 0.0,
                    expense: 0.0,
                });
                self.0.len() - 1
            }
        };

        let totals = &mut self.0[index];
        match transaction.transaction_type {
            TransactionType::Income => totals.income += transaction.value,
            TransactionType::Expense => totals.expense += transaction.value,
        }
    }

    /// Get the sub-totals for `category`.
    pub fn get(&self, category: &str) -> Option<&CategoryTotals> {
        self.0.iter().find(|totals| totals.category == category)
    }

    /// Iterate over the categories in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryTotals> {
        self.0.iter()
    }

    /// The number of categories.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no category has been seen.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The totals, breakdown and recent slice derived from a set of transactions.
///
/// Computed on demand and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationResult {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
    /// Income and expense sub-totals per category.
    pub by_category: CategoryBreakdown,
    /// Up to [RECENT_LIMIT] transactions, most recent date first.
    pub recent: Vec<TransactionRecord>,
}

/// Aggregate `transactions` into totals, a per-category breakdown and the
/// most recent entries.
///
/// The input is not modified and may be in any order. Ties on date keep their
/// input order in [AggregationResult::recent].
pub fn aggregate(transactions: &[TransactionRecord]) -> AggregationResult {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut by_category = CategoryBreakdown::default();

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => total_income += transaction.value,
            TransactionType::Expense => total_expense += transaction.value,
        }

        by_category.add(transaction);
    }

    AggregationResult {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        by_category,
        recent: most_recent(transactions, RECENT_LIMIT),
    }
}

/// The first `limit` transactions by date, newest first.
///
/// The sort is stable, so input already sorted newest first comes back as a prefix.
fn most_recent(transactions: &[TransactionRecord], limit: usize) -> Vec<TransactionRecord> {
    let mut sorted: Vec<&TransactionRecord> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted.into_iter().take(limit).cloned().collect()
}
