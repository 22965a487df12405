//! Defines the core data models for transactions and their validation.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, category::is_registered_category};

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the integer type the store uses to identify transactions.
pub type TransactionId = i64;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    #[serde(alias = "receita")]
    Income,
    /// Money spent.
    #[serde(alias = "despesa")]
    Expense,
}

impl TransactionType {
    /// The value used for this type in queries and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    /// Parses `income`/`expense`, as well as the legacy `receita`/`despesa`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_lowercase().as_str() {
            "income" | "receita" => Ok(Self::Income),
            "expense" | "despesa" => Ok(Self::Expense),
            _ => Err(Error::InvalidTransactionType(text.to_owned())),
        }
    }
}

/// An income or expense entry owned by a single user.
///
/// Records are created, updated and deleted through a
/// [TransactionStore](crate::transaction::TransactionStore) and are never
/// mutated by aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// The ID the store assigned to the transaction.
    pub id: TransactionId,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The amount of money, always positive.
    pub value: f64,
    /// The category name, normally one of
    /// [categories_for](crate::category::categories_for) for the type.
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// An optional free-text annotation.
    pub note: Option<String>,
    /// When the store created the record.
    pub created_at: OffsetDateTime,
}

/// The data needed to create a transaction, or to replace all of its fields.
///
/// Call [NewTransaction::validate] before handing it to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The amount of money, must be greater than zero.
    pub value: f64,
    /// The category name.
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// An optional free-text annotation. An empty note is stored as no note.
    #[serde(default)]
    pub note: Option<String>,
}

impl NewTransaction {
    /// Create a new transaction without a note.
    pub fn build(
        transaction_type: TransactionType,
        value: f64,
        category: &str,
        date: Date,
    ) -> Self {
        Self {
            transaction_type,
            value,
            category: category.to_owned(),
            date,
            note: None,
        }
    }

    /// Set the note for the transaction.
    pub fn note(mut self, note: &str) -> Self {
        self.note = Some(note.to_owned());
        self
    }

    /// Check the transaction the same way the entry form does.
    ///
    /// Trims the category and drops an empty note.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::InvalidValue] if the value is not a finite number above zero,
    /// - or [Error::EmptyCategory] if no category was given.
    pub fn validate(mut self) -> Result<Self, Error> {
        validate_value(self.value)?;
        self.category = validate_category(self.transaction_type, &self.category)?;
        self.note = normalize_note(self.note);

        Ok(self)
    }
}

/// A partial update to a transaction. Fields left as `None` keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    /// The new transaction type.
    #[serde(rename = "type", default)]
    pub transaction_type: Option<TransactionType>,
    /// The new amount.
    #[serde(default)]
    pub value: Option<f64>,
    /// The new category.
    #[serde(default)]
    pub category: Option<String>,
    /// The new date.
    #[serde(default)]
    pub date: Option<Date>,
    /// The new note. `Some("")` removes the note.
    #[serde(default)]
    pub note: Option<String>,
}

impl TransactionPatch {
    /// Check the fields that are present.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::InvalidValue] if a value is given that is not a finite number above zero,
    /// - or [Error::EmptyCategory] if an empty category is given.
    pub fn validate(mut self) -> Result<Self, Error> {
        if let Some(value) = self.value {
            validate_value(value)?;
        }

        if let Some(category) = self.category.take() {
            let category = match self.transaction_type {
                Some(transaction_type) => validate_category(transaction_type, &category)?,
                None => {
                    let category = category.trim();
                    if category.is_empty() {
                        return Err(Error::EmptyCategory);
                    }
                    category.to_owned()
                }
            };
            self.category = Some(category);
        }

        self.note = self.note.map(|note| note.trim().to_owned());

        Ok(self)
    }
}

impl From<NewTransaction> for TransactionPatch {
    fn from(transaction: NewTransaction) -> Self {
        Self {
            transaction_type: Some(transaction.transaction_type),
            value: Some(transaction.value),
            category: Some(transaction.category),
            date: Some(transaction.date),
            note: Some(transaction.note.unwrap_or_default()),
        }
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

fn validate_value(value: f64) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidValue(value))
    }
}

fn validate_category(transaction_type: TransactionType, category: &str) -> Result<String, Error> {
    let category = category.trim();

    if category.is_empty() {
        return Err(Error::EmptyCategory);
    }

    if !is_registered_category(transaction_type, category) {
        tracing::warn!("category \"{category}\" is not a registered {transaction_type} category");
    }

    Ok(category.to_owned())
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|note| note.trim().to_owned())
        .filter(|note| !note.is_empty())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        transaction::{NewTransaction, TransactionPatch, TransactionType},
    };

    #[test]
    fn parses_transaction_types() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!("Expense".parse(), Ok(TransactionType::Expense));
        assert_eq!("receita".parse(), Ok(TransactionType::Income));
        assert_eq!("despesa".parse(), Ok(TransactionType::Expense));
        assert_eq!(
            "transfer".parse::<TransactionType>(),
            Err(Error::InvalidTransactionType("transfer".to_owned()))
        );
    }

    #[test]
    fn deserializes_legacy_type_names() {
        let got: TransactionType = serde_json::from_str("\"receita\"").unwrap();

        assert_eq!(got, TransactionType::Income);
    }

    #[test]
    fn validate_accepts_positive_value() {
        let transaction =
            NewTransaction::build(TransactionType::Income, 10.5, " Salário ", date!(2024 - 02 - 05))
                .note("  ");

        let got = transaction.validate().unwrap();

        assert_eq!(got.category, "Salário");
        assert_eq!(got.note, None);
    }

    #[test]
    fn validate_rejects_zero_and_negative_values() {
        for value in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let transaction =
                NewTransaction::build(TransactionType::Expense, value, "Lazer", date!(2024 - 02 - 05));

            assert!(matches!(
                transaction.validate(),
                Err(Error::InvalidValue(_))
            ));
        }
    }

    #[test]
    fn validate_rejects_empty_category() {
        let transaction =
            NewTransaction::build(TransactionType::Expense, 12.0, "   ", date!(2024 - 02 - 05));

        assert_eq!(transaction.validate(), Err(Error::EmptyCategory));
    }

    #[test]
    fn validate_accepts_unregistered_category() {
        let transaction =
            NewTransaction::build(TransactionType::Expense, 12.0, "Pets", date!(2024 - 02 - 05));

        assert_eq!(transaction.validate().unwrap().category, "Pets");
    }

    #[test]
    fn patch_only_checks_present_fields() {
        let patch = TransactionPatch {
            note: Some("updated".to_owned()),
            ..Default::default()
        };

        assert_eq!(patch.clone().validate(), Ok(patch));
    }

    #[test]
    fn patch_rejects_invalid_value() {
        let patch = TransactionPatch {
            value: Some(-3.0),
            ..Default::default()
        };

        assert_eq!(patch.validate(), Err(Error::InvalidValue(-3.0)));
    }

    #[test]
    fn new_transaction_deserializes_from_form_json() {
        let json = r#"{"type":"expense","value":200.0,"category":"Lazer","date":"2024-02-10"}"#;

        let got: NewTransaction = serde_json::from_str(json).unwrap();

        assert_eq!(
            got,
            NewTransaction::build(TransactionType::Expense, 200.0, "Lazer", date!(2024 - 02 - 10))
        );
    }
}
