//! Defines the app level error type and its conversion to JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request needs a signed-in user but there is no valid session cookie.
    #[error("no user is signed in")]
    Unauthenticated,

    /// The user ID given when signing in was empty.
    #[error("the user ID cannot be empty")]
    EmptyUserId,

    /// A transaction value was zero, negative or not a number.
    #[error("{0} is not a valid value, the value must be a number greater than zero")]
    InvalidValue(f64),

    /// A transaction was given an empty category.
    #[error("the category cannot be empty")]
    EmptyCategory,

    /// A string could not be parsed as a transaction type.
    #[error("\"{0}\" is not a transaction type, expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// An export was requested but the user has no transactions.
    #[error("there are no transactions to export")]
    NothingToExport,

    /// The CSV export could not be written.
    #[error("could not write the CSV export: {0}")]
    CsvError(String),

    /// A date could not be written in the export format.
    #[error("could not format date: {0}")]
    DateFormatError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A request or response body could not be buffered for logging.
    #[error("could not read the message body")]
    BodyReadError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl From<time::error::Format> for Error {
    fn from(value: time::error::Format) -> Self {
        Error::DateFormatError(value.to_string())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::EmptyUserId
            | Error::InvalidValue(_)
            | Error::EmptyCategory
            | Error::InvalidTransactionType(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::NothingToExport => StatusCode::NOT_FOUND,
            Error::CsvError(_)
            | Error::DateFormatError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::BodyReadError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal details are for the server logs only.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
