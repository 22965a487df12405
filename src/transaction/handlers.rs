//! JSON endpoints for listing, editing and exporting transactions.
//!
//! Reads accept anonymous requests and answer them with empty lists. Writes
//! and single-record lookups need a session.

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION},
    },
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{all_categories, categories_for},
    endpoints::{self, format_endpoint},
    export::{EXPORT_FILE_NAME, transactions_to_csv},
    filter::{FilterQuery, Selector},
    ledger::{
        delete_transaction, load_export_rows, load_transactions, load_used_categories,
        patch_transaction, save_transaction,
    },
    request::{RequestTrackers, generation_headers},
    session::Session,
    transaction::{
        NewTransaction, SQLiteTransactionStore, TransactionId, TransactionPatch,
        TransactionRecord, TransactionStore, TransactionType,
    },
};

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The store holding every user's transactions.
    pub store: SQLiteTransactionStore,
    /// Orders each user's list requests.
    pub request_trackers: RequestTrackers,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.transaction_store.clone(),
            request_trackers: state.request_trackers.clone(),
        }
    }
}

/// A route handler for the transactions matching the query filters, newest first.
///
/// Signed-in requests carry their generation in the `x-request-generation`
/// header.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    session: Option<Session>,
    Query(query): Query<FilterQuery>,
) -> Result<impl IntoResponse, Error> {
    let token = session
        .as_ref()
        .map(|session| state.request_trackers.issue(session));
    let filter = query.resolve();

    let transactions = load_transactions(session.as_ref(), &state.store, &filter).await?;

    Ok((generation_headers(token.as_ref()), Json(transactions)))
}

/// A route handler for creating a new transaction.
///
/// Responds with the created transaction and its URI in the `Location` header.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    session: Session,
    Json(transaction): Json<NewTransaction>,
) -> Result<impl IntoResponse, Error> {
    let id = save_transaction(&session, &state.store, None, transaction).await?;
    let transaction = state.store.get(session.user_id(), id).await?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format_endpoint(endpoints::TRANSACTION, id))],
        Json(transaction),
    ))
}

/// A route handler for getting one of the user's transactions.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    session: Session,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<TransactionRecord>, Error> {
    state
        .store
        .get(session.user_id(), transaction_id)
        .await
        .map(Json)
}

/// A route handler for replacing every field of a transaction.
pub async fn replace_transaction_endpoint(
    State(state): State<TransactionState>,
    session: Session,
    Path(transaction_id): Path<TransactionId>,
    Json(transaction): Json<NewTransaction>,
) -> Result<Json<TransactionRecord>, Error> {
    save_transaction(&session, &state.store, Some(transaction_id), transaction).await?;

    state
        .store
        .get(session.user_id(), transaction_id)
        .await
        .map(Json)
}

/// A route handler for updating some fields of a transaction.
pub async fn patch_transaction_endpoint(
    State(state): State<TransactionState>,
    session: Session,
    Path(transaction_id): Path<TransactionId>,
    Json(patch): Json<TransactionPatch>,
) -> Result<Json<TransactionRecord>, Error> {
    patch_transaction(&session, &state.store, transaction_id, patch).await?;

    state
        .store
        .get(session.user_id(), transaction_id)
        .await
        .map(Json)
}

/// A route handler for deleting a transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    session: Session,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    delete_transaction(&session, &state.store, transaction_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// The query string of the category list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct CategoriesQuery {
    /// `income`, `expense` or `all`.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

/// A route handler for the registered categories of a transaction type.
///
/// Without a concrete type every registered category is listed.
pub async fn get_categories_endpoint(
    Query(query): Query<CategoriesQuery>,
) -> Json<Vec<&'static str>> {
    let categories =
        match Selector::<TransactionType>::parse_or_all(query.transaction_type.as_deref()) {
            Selector::Only(transaction_type) => categories_for(transaction_type).to_vec(),
            Selector::All => all_categories(),
        };

    Json(categories)
}

/// A route handler for the categories the user has recorded.
pub async fn get_used_categories_endpoint(
    State(state): State<TransactionState>,
    session: Option<Session>,
) -> Result<Json<Vec<String>>, Error> {
    load_used_categories(session.as_ref(), &state.store)
        .await
        .map(Json)
}

/// A route handler that downloads every transaction of the user as CSV.
pub async fn export_transactions_endpoint(
    State(state): State<TransactionState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let rows = load_export_rows(Some(&session), &state.store).await?;
    let csv = transactions_to_csv(&rows)
        .inspect_err(|error| tracing::warn!("could not export transactions: {error}"))?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    ))
}
