//! The fixed category lists offered for each transaction type.
//!
//! The lists populate the category choices of the entry form. Aggregation
//! does not enforce them: any category string on a record becomes a valid
//! grouping key.

use std::collections::BTreeSet;

use crate::transaction::{TransactionRecord, TransactionType};

/// The catch-all category that ends both lists.
pub const OTHER_CATEGORY: &str = "Outros";

/// Categories for income, in display order.
pub const INCOME_CATEGORIES: [&str; 6] = [
    "Salário",
    "Freelance",
    "Investimentos",
    "Vendas",
    "Presentes",
    OTHER_CATEGORY,
];

/// Categories for expenses, in display order.
pub const EXPENSE_CATEGORIES: [&str; 9] = [
    "Alimentação",
    "Moradia",
    "Transporte",
    "Saúde",
    "Educação",
    "Lazer",
    "Vestuário",
    "Contas",
    OTHER_CATEGORY,
];

/// Get the ordered category names for `transaction_type`.
pub fn categories_for(transaction_type: TransactionType) -> &'static [&'static str] {
    match transaction_type {
        TransactionType::Income => &INCOME_CATEGORIES,
        TransactionType::Expense => &EXPENSE_CATEGORIES,
    }
}

/// Every registered category, income first, each name once.
pub fn all_categories() -> Vec<&'static str> {
    let mut categories = INCOME_CATEGORIES.to_vec();

    for category in EXPENSE_CATEGORIES {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }

    categories
}

/// Whether `category` is one of the registered names for `transaction_type`.
pub fn is_registered_category(transaction_type: TransactionType, category: &str) -> bool {
    categories_for(transaction_type).contains(&category)
}

/// The distinct categories used by `transactions`, sorted by name.
pub fn used_categories(transactions: &[TransactionRecord]) -> Vec<String> {
    transactions
        .iter()
        .map(|transaction| transaction.category.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{OffsetDateTime, macros::date};

    use crate::{
        category::{
            EXPENSE_CATEGORIES, INCOME_CATEGORIES, OTHER_CATEGORY, all_categories,
            categories_for, is_registered_category, used_categories,
        },
        transaction::{TransactionRecord, TransactionType},
    };

    fn record(category: &str) -> TransactionRecord {
        TransactionRecord {
            id: 1,
            transaction_type: TransactionType::Expense,
            value: 1.0,
            category: category.to_owned(),
            date: date!(2024 - 01 - 01),
            note: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn lists_end_with_catch_all() {
        assert_eq!(INCOME_CATEGORIES.len(), 6);
        assert_eq!(EXPENSE_CATEGORIES.len(), 9);
        assert_eq!(INCOME_CATEGORIES.last(), Some(&OTHER_CATEGORY));
        assert_eq!(EXPENSE_CATEGORIES.last(), Some(&OTHER_CATEGORY));
    }

    #[test]
    fn categories_for_selects_list_by_type() {
        assert_eq!(categories_for(TransactionType::Income)[0], "Salário");
        assert_eq!(categories_for(TransactionType::Expense)[0], "Alimentação");
    }

    #[test]
    fn all_categories_lists_catch_all_once() {
        let categories = all_categories();

        assert_eq!(categories.len(), 14);
        assert_eq!(categories[0], "Salário");
        assert_eq!(categories[6], "Alimentação");
        assert_eq!(
            categories
                .iter()
                .filter(|category| **category == OTHER_CATEGORY)
                .count(),
            1
        );
    }

    #[test]
    fn registered_category_depends_on_type() {
        assert!(is_registered_category(TransactionType::Income, "Freelance"));
        assert!(!is_registered_category(TransactionType::Expense, "Freelance"));
        assert!(is_registered_category(TransactionType::Expense, OTHER_CATEGORY));
    }

    #[test]
    fn used_categories_are_unique_and_sorted() {
        let transactions = vec![record("Lazer"), record("Contas"), record("Lazer")];

        assert_eq!(used_categories(&transactions), vec!["Contas", "Lazer"]);
    }
}
