//! Column listings read from SQLite.

use oxide_batch_core::schema::ColumnCache;
use oxide_batch_core::{BatchError, Target};
use sqlx::sqlite::SqlitePool;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;

const TABLE_COLUMNS_SQL: &str = "SELECT name FROM pragma_table_info(?) ORDER BY cid";

/// Lists the columns of `table`.
///
/// Returns an empty list when the table does not exist.
pub async fn table_columns(pool: &SqlitePool, table: &str) -> Result<Vec<String>> {
    let columns: Vec<String> = sqlx::query_scalar(TABLE_COLUMNS_SQL)
        .bind(table)
        .fetch_all(pool)
        .await?;
    Ok(columns)
}

/// Caches column listings per prefixed table name.
#[derive(Debug, Default)]
pub struct SchemaCache {
    columns: Mutex<ColumnCache>,
}

impl SchemaCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the columns of the target's table, reading them from
    /// `pool` on a miss.
    ///
    /// # Errors
    ///
    /// [`BatchError::ColumnsUnavailable`] when the table has no columns, which
    /// is what SQLite reports for a missing table.
    pub async fn columns(&self, pool: &SqlitePool, target: &Target) -> Result<Vec<String>> {
        let table = target.qualified_table();
        let mut cache = self.columns.lock().await;
        if let Some(columns) = cache.get(&table) {
            return Ok(columns.to_vec());
        }

        let columns = table_columns(pool, &table).await?;
        if columns.is_empty() {
            return Err(BatchError::ColumnsUnavailable { table }.into());
        }
        debug!(table = %table, columns = columns.len(), "Loaded table columns");
        cache.insert(table, columns.clone());
        Ok(columns)
    }

    /// Returns a copy of `target` carrying its table's columns.
    ///
    /// # Errors
    ///
    /// See [`columns`](Self::columns).
    pub async fn bind(&self, pool: &SqlitePool, target: &Target) -> Result<Target> {
        let columns = self.columns(pool, target).await?;
        Ok(target.clone().known_columns(columns))
    }

    /// Forgets the listing of the target's table, e.g. after a migration.
    pub async fn invalidate(&self, target: &Target) {
        self.columns.lock().await.invalidate(&target.qualified_table());
    }

    /// Forgets every listing.
    pub async fn clear(&self) {
        self.columns.lock().await.clear();
    }
}
