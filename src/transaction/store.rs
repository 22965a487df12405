//! Defines the record store gateway that transactions are read from and written to.

use std::future::Future;

use crate::{
    Error,
    session::UserId,
    transaction::{
        DateRange, NewTransaction, TransactionId, TransactionPatch, TransactionRecord,
    },
};

/// Handles the storage of each user's transactions.
///
/// Every operation is scoped to a single user. Implementations report
/// transport or permission failures as an [Error] and must not retry.
pub trait TransactionStore {
    /// Retrieve the user's transactions in the way defined by `query`.
    fn query(
        &self,
        user_id: &UserId,
        query: TransactionQuery,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>, Error>> + Send;

    /// Retrieve all of the user's transactions in the order they are stored.
    fn get_all(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>, Error>> + Send;

    /// Retrieve a single transaction.
    ///
    /// Returns [Error::NotFound] if the user has no transaction with `id`.
    fn get(
        &self,
        user_id: &UserId,
        id: TransactionId,
    ) -> impl Future<Output = Result<TransactionRecord, Error>> + Send;

    /// Create a transaction, returning the ID the store assigned to it.
    fn create(
        &self,
        user_id: &UserId,
        transaction: NewTransaction,
    ) -> impl Future<Output = Result<TransactionId, Error>> + Send;

    /// Update the fields of a transaction that are set in `patch`.
    ///
    /// Returns [Error::UpdateMissingTransaction] if the user has no transaction with `id`.
    fn update(
        &self,
        user_id: &UserId,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Delete a transaction.
    ///
    /// Returns [Error::DeleteMissingTransaction] if the user has no transaction with `id`.
    fn delete(
        &self,
        user_id: &UserId,
        id: TransactionId,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Defines how transactions should be fetched from [TransactionStore::query].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Include transactions within `date_range` (inclusive). `None` includes every date.
    pub date_range: Option<DateRange>,
    /// Orders transactions by date in the order `sort_date`. None returns transactions in the
    /// order they are stored.
    pub sort_date: Option<SortOrder>,
}

impl TransactionQuery {
    /// A query for the transactions in `date_range`, newest first.
    pub fn newest_first(date_range: Option<DateRange>) -> Self {
        Self {
            date_range,
            sort_date: Some(SortOrder::Descending),
        }
    }
}

/// The order to sort transactions in a [TransactionQuery].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}
