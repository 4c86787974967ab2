//! Statement execution against a SQLite pool.

use oxide_batch_core::CompiledStatement;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use crate::error::Result;

/// Runs compiled batched updates on a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    /// Creates an executor on `pool`.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Executes `statement`, returning the number of affected rows.
    pub async fn execute(&self, statement: &CompiledStatement) -> Result<u64> {
        self.execute_sql(statement.sql()).await
    }

    /// Executes raw SQL text, returning the number of affected rows.
    pub async fn execute_sql(&self, sql: &str) -> Result<u64> {
        debug!(sql = %sql, "Executing batched update");
        let result = sqlx::query(sql).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
