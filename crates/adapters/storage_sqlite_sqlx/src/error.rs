//! Storage-specific error type wrapping sqlx errors.

use backsync_domain::error::CrudError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to encode a structured value for storage.
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A filter referenced a column the table does not have.
    #[error("no column {column} on table {table}")]
    Column {
        /// Table the query ran against.
        table: String,
        /// Column name that failed to resolve.
        column: String,
    },

    /// The table is missing or has no single-column primary key to
    /// address rows by.
    #[error("table {0} has no usable primary key")]
    PrimaryKey(String),

    /// Write or delete attempted on a model that was never loaded or
    /// saved.
    #[error("cannot {0} an unloaded model")]
    Unloaded(&'static str),
}

impl From<StorageError> for CrudError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
