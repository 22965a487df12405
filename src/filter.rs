//! Translates the period, type and category selected by the user into a
//! store-side date range plus a residual predicate applied in memory.
//!
//! Selector parsing is permissive: a missing, `all` or unparseable value
//! resolves to [Selector::All] instead of an error.

use std::{fmt::Display, str::FromStr};

use serde::Deserialize;
use time::Month;

use crate::transaction::{
    DateRange, TransactionQuery, TransactionRecord, TransactionType, month_from_index,
};

/// The selector value that disables a filter.
pub const ALL: &str = "all";

/// A filter choice that is either unrestricted or a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<T> {
    /// No filtering. Also the fallback for malformed input.
    All,
    /// Keep only this value.
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T> Selector<T>
where
    T: FromStr,
{
    /// Parse a raw selector value, falling back to [Selector::All].
    ///
    /// `None`, an empty string, `all` (in any case) and any value that does
    /// not parse as `T` all mean "no filter".
    pub fn parse_or_all(raw: Option<&str>) -> Self {
        let text = match raw.map(str::trim) {
            None | Some("") => return Self::All,
            Some(text) if text.eq_ignore_ascii_case(ALL) => return Self::All,
            Some(text) => text,
        };

        match text.parse() {
            Ok(value) => Self::Only(value),
            Err(_) => {
                tracing::debug!("ignoring malformed filter value \"{text}\"");
                Self::All
            }
        }
    }
}

impl<T> Selector<T>
where
    T: PartialEq,
{
    /// Whether `value` passes this selector.
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == value,
        }
    }
}

/// A selector value that could not be parsed.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("invalid selector value \"{0}\"")]
pub struct InvalidSelector(String);

/// A zero-based month index, 0 = January through 11 = December.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex(Month);

impl MonthIndex {
    /// The calendar month for this index.
    pub fn month(self) -> Month {
        self.0
    }
}

impl FromStr for MonthIndex {
    type Err = InvalidSelector;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.parse::<u8>()
            .ok()
            .and_then(month_from_index)
            .map(Self)
            .ok_or_else(|| InvalidSelector(text.to_owned()))
    }
}

/// A four digit calendar year.
///
/// Years are limited to `0..=9999` so that ISO date strings keep comparing
/// in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Year(i32);

impl Year {
    /// The year as an integer.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl FromStr for Year {
    type Err = InvalidSelector;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.parse::<i32>()
            .ok()
            .filter(|year| (0..=9999).contains(year))
            .map(Self)
            .ok_or_else(|| InvalidSelector(text.to_owned()))
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The raw filter values as they arrive from the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    /// The zero-based month index or `all`.
    pub month: Option<String>,
    /// The year or `all`.
    pub year: Option<String>,
    /// `income`, `expense` or `all`.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// A category name or `all`.
    pub category: Option<String>,
}

impl FilterQuery {
    /// Resolve the raw values, see [resolve_filter].
    pub fn resolve(&self) -> ResolvedFilter {
        resolve_filter(
            self.month.as_deref(),
            self.year.as_deref(),
            self.transaction_type.as_deref(),
            self.category.as_deref(),
        )
    }
}

/// The in-memory part of a filter, for selections the store cannot express.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidualPredicate {
    /// Keep only records of this type.
    pub transaction_type: Selector<TransactionType>,
    /// Keep only records in this category. Checked after the type.
    pub category: Selector<String>,
}

impl ResidualPredicate {
    /// Whether `transaction` passes both selectors.
    pub fn matches(&self, transaction: &TransactionRecord) -> bool {
        self.transaction_type
            .admits(&transaction.transaction_type)
            && self.category.admits(&transaction.category)
    }

    /// Keep the transactions that pass, preserving their order.
    pub fn apply(&self, mut transactions: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
        transactions.retain(|transaction| self.matches(transaction));
        transactions
    }
}

/// A store-side date range plus the residual predicate to apply afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFilter {
    /// The inclusive date range, or `None` to fetch every date.
    pub range: Option<DateRange>,
    /// The filter applied to the fetched records.
    pub predicate: ResidualPredicate,
}

impl ResolvedFilter {
    /// The store query for this filter, newest first.
    pub fn to_query(&self) -> TransactionQuery {
        TransactionQuery::newest_first(self.range)
    }
}

/// Resolve the user's selections into a [ResolvedFilter].
///
/// - Month and year both concrete: that calendar month.
/// - Only the year concrete: the whole year. A month without a year is ignored.
/// - Otherwise: no date restriction.
///
/// The type and category selectors become the residual predicate.
pub fn resolve_filter(
    month: Option<&str>,
    year: Option<&str>,
    transaction_type: Option<&str>,
    category: Option<&str>,
) -> ResolvedFilter {
    let month = Selector::<MonthIndex>::parse_or_all(month);
    let year = Selector::<Year>::parse_or_all(year);

    let range = match (month, year) {
        (Selector::Only(month), Selector::Only(year)) => DateRange::month(year.get(), month.month()),
        (Selector::All, Selector::Only(year)) => DateRange::year(year.get()),
        (_, Selector::All) => None,
    };

    ResolvedFilter {
        range,
        predicate: ResidualPredicate {
            transaction_type: Selector::parse_or_all(transaction_type),
            category: Selector::parse_or_all(category),
        },
    }
}
