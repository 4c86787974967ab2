//! Error types for SQLite batch updates.

use oxide_batch_core::BatchError;

/// Errors raised while compiling or running a batched update on SQLite.
#[derive(Debug, thiserror::Error)]
pub enum SqliteBatchError {
    /// The rows could not be compiled; nothing was sent to the database.
    #[error(transparent)]
    Compile(#[from] BatchError),

    /// Database error while listing columns or executing the statement.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for SQLite batch updates.
pub type Result<T> = std::result::Result<T, SqliteBatchError>;
