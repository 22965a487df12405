//! Transaction management for the finance dashboard.
//!
//! This module contains everything related to transactions:
//! - The `TransactionRecord` model and the `NewTransaction`/`TransactionPatch` write models
//! - The `TransactionStore` gateway and its SQLite implementation
//! - Calendar date ranges used to narrow store queries
//! - The JSON endpoints for listing and editing transactions

mod core;
mod handlers;
mod range;
mod sqlite;
mod store;

pub use core::{NewTransaction, TransactionId, TransactionPatch, TransactionRecord, TransactionType};
pub use handlers::{
    TransactionState, create_transaction_endpoint, delete_transaction_endpoint,
    export_transactions_endpoint, get_categories_endpoint, get_transaction_endpoint,
    get_used_categories_endpoint, list_transactions_endpoint, patch_transaction_endpoint,
    replace_transaction_endpoint,
};
pub use range::{DateRange, month_from_index};
pub use sqlite::{SQLiteTransactionStore, create_transaction_table};
pub use store::{SortOrder, TransactionQuery, TransactionStore};
