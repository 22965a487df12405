//! Creates the application's database schema.

use rusqlite::Connection;

use crate::{Error, transaction::create_transaction_table};

/// Create the tables and indexes used by the application.
///
/// Safe to call on a database that was already initialized.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_transaction_table(connection)
        .inspect_err(|error| tracing::error!("could not create the transaction table: {error}"))?;

    Ok(())
}
