//! The operations behind the dashboard and transaction views.
//!
//! Every read takes the caller's session explicitly. Without a session the
//! read short-circuits to an empty result and the store is never queried.
//! Store failures are returned unchanged, nothing here retries.

use crate::{
    Error,
    category::used_categories,
    dashboard::{AggregationResult, aggregate},
    filter::ResolvedFilter,
    session::Session,
    transaction::{
        NewTransaction, TransactionId, TransactionPatch, TransactionQuery, TransactionRecord,
        TransactionStore,
    },
};

/// Fetch the transactions selected by `filter`, newest first.
///
/// The date range is queried from the store, then the type and category
/// selectors are applied in memory.
///
/// # Errors
/// Returns any error reported by `store`.
pub async fn load_transactions<S>(
    session: Option<&Session>,
    store: &S,
    filter: &ResolvedFilter,
) -> Result<Vec<TransactionRecord>, Error>
where
    S: TransactionStore,
{
    let Some(session) = session else {
        return Ok(Vec::new());
    };

    let transactions = store
        .query(session.user_id(), filter.to_query())
        .await
        .inspect_err(|error| tracing::error!("could not query transactions: {error}"))?;
    let fetched = transactions.len();
    let transactions = filter.predicate.apply(transactions);

    tracing::debug!(
        "loaded {} of {fetched} transactions for user {}",
        transactions.len(),
        session.user_id()
    );

    Ok(transactions)
}

/// Aggregate the transactions selected by `filter` for the dashboard.
///
/// Without a session this returns the zero result.
///
/// # Errors
/// Returns any error reported by `store`.
pub async fn load_dashboard<S>(
    session: Option<&Session>,
    store: &S,
    filter: &ResolvedFilter,
) -> Result<AggregationResult, Error>
where
    S: TransactionStore,
{
    let transactions = load_transactions(session, store, filter).await?;

    Ok(aggregate(&transactions))
}

/// The distinct categories the user has recorded, sorted by name.
///
/// # Errors
/// Returns any error reported by `store`.
pub async fn load_used_categories<S>(
    session: Option<&Session>,
    store: &S,
) -> Result<Vec<String>, Error>
where
    S: TransactionStore,
{
    let Some(session) = session else {
        return Ok(Vec::new());
    };

    let transactions = store.get_all(session.user_id()).await?;

    Ok(used_categories(&transactions))
}

/// All of the user's transactions, newest first, for exporting.
///
/// # Errors
/// Returns any error reported by `store`.
pub async fn load_export_rows<S>(
    session: Option<&Session>,
    store: &S,
) -> Result<Vec<TransactionRecord>, Error>
where
    S: TransactionStore,
{
    let Some(session) = session else {
        return Ok(Vec::new());
    };

    store
        .query(session.user_id(), TransactionQuery::newest_first(None))
        .await
}

/// Create a transaction, or replace every field of transaction `id` if given.
///
/// Returns the ID of the saved transaction.
///
/// # Errors
/// Returns a validation error from [NewTransaction::validate] or any error
/// reported by `store`.
pub async fn save_transaction<S>(
    session: &Session,
    store: &S,
    id: Option<TransactionId>,
    transaction: NewTransaction,
) -> Result<TransactionId, Error>
where
    S: TransactionStore,
{
    let transaction = transaction.validate()?;

    match id {
        Some(id) => {
            store
                .update(session.user_id(), id, transaction.into())
                .await?;
            tracing::info!("updated transaction {id} for user {}", session.user_id());
            Ok(id)
        }
        None => {
            let id = store.create(session.user_id(), transaction).await?;
            tracing::info!("created transaction {id} for user {}", session.user_id());
            Ok(id)
        }
    }
}

/// Update the fields of transaction `id` that are set in `patch`.
///
/// # Errors
/// Returns a validation error from [TransactionPatch::validate] or any error
/// reported by `store`.
pub async fn patch_transaction<S>(
    session: &Session,
    store: &S,
    id: TransactionId,
    patch: TransactionPatch,
) -> Result<(), Error>
where
    S: TransactionStore,
{
    let patch = patch.validate()?;

    store.update(session.user_id(), id, patch).await
}

/// Delete transaction `id`.
///
/// # Errors
/// Returns any error reported by `store`.
pub async fn delete_transaction<S>(
    session: &Session,
    store: &S,
    id: TransactionId,
) -> Result<(), Error>
where
    S: TransactionStore,
{
    store.delete(session.user_id(), id).await?;
    tracing::info!("deleted transaction {id} for user {}", session.user_id());

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        dashboard::AggregationResult,
        db::initialize,
        filter::resolve_filter,
        ledger::{
            delete_transaction, load_dashboard, load_export_rows, load_transactions,
            load_used_categories, patch_transaction, save_transaction,
        },
        session::{Session, UserId},
        transaction::{
            NewTransaction, SQLiteTransactionStore, TransactionId, TransactionPatch,
            TransactionQuery, TransactionRecord, TransactionStore, TransactionType,
        },
    };

    /// A store that fails every call and counts how often it was asked.
    #[derive(Default)]
    struct FailingStore {
        calls: AtomicUsize,
    }

    impl FailingStore {
        fn fail(&self) -> Error {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Error::DatabaseLockError
        }
    }

    impl TransactionStore for FailingStore {
        async fn query(
            &self,
            _: &UserId,
            _: TransactionQuery,
        ) -> Result<Vec<TransactionRecord>, Error> {
            Err(self.fail())
        }

        async fn get_all(&self, _: &UserId) -> Result<Vec<TransactionRecord>, Error> {
            Err(self.fail())
        }

        async fn get(&self, _: &UserId, _: TransactionId) -> Result<TransactionRecord, Error> {
            Err(self.fail())
        }

        async fn create(&self, _: &UserId, _: NewTransaction) -> Result<TransactionId, Error> {
            Err(self.fail())
        }

        async fn update(
            &self,
            _: &UserId,
            _: TransactionId,
            _: TransactionPatch,
        ) -> Result<(), Error> {
            Err(self.fail())
        }

        async fn delete(&self, _: &UserId, _: TransactionId) -> Result<(), Error> {
            Err(self.fail())
        }
    }

    fn get_test_store() -> SQLiteTransactionStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        SQLiteTransactionStore::new(Arc::new(Mutex::new(connection)))
    }

    fn session(id: &str) -> Session {
        Session::new(UserId::new(id).unwrap())
    }

    async fn seed(store: &SQLiteTransactionStore, session: &Session) {
        let transactions = [
            NewTransaction::build(TransactionType::Income, 1000.0, "Salário", date!(2024 - 02 - 05)),
            NewTransaction::build(TransactionType::Expense, 200.0, "Lazer", date!(2024 - 02 - 10)),
            NewTransaction::build(TransactionType::Expense, 80.0, "Contas", date!(2024 - 03 - 02)),
            NewTransaction::build(TransactionType::Expense, 45.0, "Lazer", date!(2023 - 12 - 24)),
        ];

        for transaction in transactions {
            save_transaction(session, store, None, transaction)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn unauthenticated_reads_are_empty_without_querying() {
        let store = FailingStore::default();
        let filter = resolve_filter(Some("1"), Some("2024"), None, None);

        assert_eq!(load_transactions(None, &store, &filter).await, Ok(vec![]));
        assert_eq!(
            load_dashboard(None, &store, &filter).await,
            Ok(AggregationResult::default())
        );
        assert_eq!(load_used_categories(None, &store).await, Ok(vec![]));
        assert_eq!(load_export_rows(None, &store).await, Ok(vec![]));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn store_errors_propagate_once() {
        let store = FailingStore::default();
        let alice = session("alice");

        let result = load_transactions(Some(&alice), &store, &Default::default()).await;

        assert_eq!(result, Err(Error::DatabaseLockError));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn loads_month_filtered_by_type() {
        let store = get_test_store();
        let alice = session("alice");
        seed(&store, &alice).await;
        let filter = resolve_filter(Some("1"), Some("2024"), Some("expense"), None);

        let got = load_transactions(Some(&alice), &store, &filter).await.unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].category, "Lazer");
        assert_eq!(got[0].value, 200.0);
    }

    #[tokio::test]
    async fn loads_year_newest_first() {
        let store = get_test_store();
        let alice = session("alice");
        seed(&store, &alice).await;
        let filter = resolve_filter(None, Some("2024"), None, None);

        let got = load_transactions(Some(&alice), &store, &filter).await.unwrap();

        let dates: Vec<_> = got.iter().map(|transaction| transaction.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 03 - 02),
                date!(2024 - 02 - 10),
                date!(2024 - 02 - 05)
            ]
        );
    }

    #[tokio::test]
    async fn dashboard_aggregates_selected_month() {
        let store = get_test_store();
        let alice = session("alice");
        seed(&store, &alice).await;
        let filter = resolve_filter(Some("1"), Some("2024"), None, None);

        let result = load_dashboard(Some(&alice), &store, &filter).await.unwrap();

        assert_eq!(result.total_income, 1000.0);
        assert_eq!(result.total_expense, 200.0);
        assert_eq!(result.balance, 800.0);
        assert_eq!(result.recent.len(), 2);
    }

    #[tokio::test]
    async fn used_categories_are_per_user() {
        let store = get_test_store();
        let alice = session("alice");
        seed(&store, &alice).await;
        save_transaction(
            &session("bob"),
            &store,
            None,
            NewTransaction::build(TransactionType::Expense, 5.0, "Saúde", date!(2024 - 01 - 01)),
        )
        .await
        .unwrap();

        let got = load_used_categories(Some(&alice), &store).await.unwrap();

        assert_eq!(got, vec!["Contas", "Lazer", "Salário"]);
    }

    #[tokio::test]
    async fn save_rejects_invalid_transaction_before_storing() {
        let store = FailingStore::default();

        let result = save_transaction(
            &session("alice"),
            &store,
            None,
            NewTransaction::build(TransactionType::Expense, 0.0, "Lazer", date!(2024 - 01 - 01)),
        )
        .await;

        assert_eq!(result, Err(Error::InvalidValue(0.0)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn save_with_id_replaces_transaction() {
        let store = get_test_store();
        let alice = session("alice");
        let id = save_transaction(
            &alice,
            &store,
            None,
            NewTransaction::build(TransactionType::Expense, 10.0, "Lazer", date!(2024 - 01 - 01))
                .note("cinema"),
        )
        .await
        .unwrap();

        save_transaction(
            &alice,
            &store,
            Some(id),
            NewTransaction::build(TransactionType::Income, 99.0, "Vendas", date!(2024 - 01 - 03)),
        )
        .await
        .unwrap();

        let got = store.get(alice.user_id(), id).await.unwrap();
        assert_eq!(got.transaction_type, TransactionType::Income);
        assert_eq!(got.value, 99.0);
        assert_eq!(got.category, "Vendas");
        assert_eq!(got.date, date!(2024 - 01 - 03));
        assert_eq!(got.note, None);
    }

    #[tokio::test]
    async fn patch_and_delete_missing_transaction_fail() {
        let store = get_test_store();
        let alice = session("alice");

        assert_eq!(
            patch_transaction(&alice, &store, 7, TransactionPatch::default()).await,
            Err(Error::UpdateMissingTransaction)
        );
        assert_eq!(
            delete_transaction(&alice, &store, 7).await,
            Err(Error::DeleteMissingTransaction)
        );
    }

    #[tokio::test]
    async fn export_rows_include_every_date() {
        let store = get_test_store();
        let alice = session("alice");
        seed(&store, &alice).await;

        let got = load_export_rows(Some(&alice), &store).await.unwrap();

        assert_eq!(got.len(), 4);
        assert_eq!(got[0].date, date!(2024 - 03 - 02));
        assert_eq!(got[3].date, date!(2023 - 12 - 24));
    }
}
