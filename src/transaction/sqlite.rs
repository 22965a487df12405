//! Implements the transaction store with a SQLite database.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{
    Connection, Row, params_from_iter,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use time::OffsetDateTime;

use crate::{
    Error,
    session::UserId,
    transaction::{
        NewTransaction, SortOrder, TransactionId, TransactionPatch, TransactionQuery,
        TransactionRecord, TransactionStore, TransactionType,
    },
};

/// Stores transactions in a SQLite database shared behind a mutex.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The transaction table must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, type, value, category, date, note, created_at FROM \"transaction\"";

impl TransactionStore for SQLiteTransactionStore {
    async fn query(
        &self,
        user_id: &UserId,
        query: TransactionQuery,
    ) -> Result<Vec<TransactionRecord>, Error> {
        let mut sql = format!("{SELECT_COLUMNS} WHERE user_id = ?1");
        let mut params = vec![user_id.as_str().to_owned()];

        if let Some(date_range) = query.date_range {
            // Dates are stored as ISO strings, so this is a string range comparison.
            sql.push_str(" AND date >= ?2 AND date <= ?3");
            params.push(date_range.lower_bound());
            params.push(date_range.upper_bound());
        }

        sql.push_str(match query.sort_date {
            Some(SortOrder::Descending) => " ORDER BY date DESC, id ASC",
            Some(SortOrder::Ascending) => " ORDER BY date ASC, id ASC",
            None => " ORDER BY id ASC",
        });

        let connection = self.lock()?;
        let mut statement = connection.prepare(&sql)?;
        statement
            .query_map(params_from_iter(params), map_transaction_row)?
            .collect::<Result<Vec<TransactionRecord>, rusqlite::Error>>()
            .map_err(|error| error.into())
    }

    async fn get_all(&self, user_id: &UserId) -> Result<Vec<TransactionRecord>, Error> {
        self.query(user_id, TransactionQuery::default()).await
    }

    async fn get(&self, user_id: &UserId, id: TransactionId) -> Result<TransactionRecord, Error> {
        let connection = self.lock()?;
        let transaction = connection
            .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1 AND user_id = ?2"))?
            .query_row((id, user_id.as_str()), map_transaction_row)?;

        Ok(transaction)
    }

    async fn create(
        &self,
        user_id: &UserId,
        transaction: NewTransaction,
    ) -> Result<TransactionId, Error> {
        let connection = self.lock()?;
        let id = connection
            .prepare(
                "INSERT INTO \"transaction\" (user_id, type, value, category, date, note, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING id",
            )?
            .query_row(
                (
                    user_id.as_str(),
                    transaction.transaction_type,
                    transaction.value,
                    transaction.category,
                    transaction.date,
                    transaction.note,
                    OffsetDateTime::now_utc(),
                ),
                |row| row.get(0),
            )?;

        Ok(id)
    }

    async fn update(
        &self,
        user_id: &UserId,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<(), Error> {
        let connection = self.lock()?;
        let rows_affected = connection.execute(
            "UPDATE \"transaction\" SET
                type = COALESCE(?3, type),
                value = COALESCE(?4, value),
                category = COALESCE(?5, category),
                date = COALESCE(?6, date),
                note = CASE WHEN ?7 IS NULL THEN note WHEN ?7 = '' THEN NULL ELSE ?7 END
             WHERE id = ?1 AND user_id = ?2",
            (
                id,
                user_id.as_str(),
                patch.transaction_type,
                patch.value,
                patch.category,
                patch.date,
                patch.note,
            ),
        )?;

        match rows_affected {
            0 => Err(Error::UpdateMissingTransaction),
            _ => Ok(()),
        }
    }

    async fn delete(&self, user_id: &UserId, id: TransactionId) -> Result<(), Error> {
        let connection = self.lock()?;
        let rows_affected = connection.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_str()),
        )?;

        match rows_affected {
            0 => Err(Error::DeleteMissingTransaction),
            _ => Ok(()),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                value REAL NOT NULL CHECK (value > 0),
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                note TEXT,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Range queries are always scoped to a single user.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [TransactionRecord].
fn map_transaction_row(row: &Row) -> Result<TransactionRecord, rusqlite::Error> {
    Ok(TransactionRecord {
        id: row.get(0)?,
        transaction_type: row.get(1)?,
        value: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        note: row.get(5)?,
        created_at: row.get(6)?,
    })
}
