//! SQLite persistence layer.
//!
//! [`Database`] owns the connection pool; [`SqlStore`] is the
//! key-addressable table sink the sync core writes through. Tables are
//! materialized lazily from the shape of the first row written to them, with
//! a PRIMARY KEY over the declared natural-key columns — the match index
//! relies on a missing table reading as "nothing loaded yet" rather than an
//! error.

mod database;
mod store;

pub use database::Database;
pub use store::SqlStore;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),
    #[error("Row for table '{table}' is missing key column '{column}'")]
    MissingKeyColumn { table: String, column: String },
    #[error("Empty identity key for table '{0}'")]
    EmptyKey(String),
}

/// Result of an append-only insert. A key collision is a value, not an
/// error: re-running a sync legitimately re-attempts rows that are already
/// present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Inserted,
    DuplicateKey,
}
