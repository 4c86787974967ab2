//! One-call batched updates on SQLite.

use oxide_batch_core::builder::{compile_update, CompileOptions, IntoRow, Model, Row};
use oxide_batch_core::config::ConnectionConfig;
use oxide_batch_core::{BatchModel, Target};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, info};

use crate::error::Result;
use crate::executor::SqliteExecutor;
use crate::schema::SchemaCache;

/// Compiles rows into one batched update and runs it on a SQLite pool.
///
/// Column listings for strict mode are read from the database once per table
/// and cached on the updater.
#[derive(Debug)]
pub struct BatchUpdater {
    executor: SqliteExecutor,
    schema: SchemaCache,
    config: ConnectionConfig,
}

impl BatchUpdater {
    /// Creates an updater on `pool`.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            executor: SqliteExecutor::new(pool),
            schema: SchemaCache::new(),
            config: ConnectionConfig::new("sqlite"),
        }
    }

    /// Sets the table prefix applied to model targets.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    /// Returns the executor.
    #[must_use]
    pub const fn executor(&self) -> &SqliteExecutor {
        &self.executor
    }

    /// Returns the column listing cache.
    #[must_use]
    pub const fn schema(&self) -> &SchemaCache {
        &self.schema
    }

    /// Updates `target` with `rows` in a single statement.
    ///
    /// Returns `Ok(None)` without touching the database when `rows` is empty,
    /// otherwise the number of affected rows. In strict mode the target's
    /// columns are read from the database.
    pub async fn update<I>(
        &self,
        target: &Target,
        rows: I,
        options: &CompileOptions,
    ) -> Result<Option<u64>>
    where
        I: IntoIterator,
        I::Item: IntoRow,
    {
        let rows = rows
            .into_iter()
            .map(IntoRow::into_row)
            .collect::<oxide_batch_core::Result<Vec<Row>>>()?;
        if rows.is_empty() {
            debug!(table = %target.qualified_table(), "No rows supplied, nothing to update");
            return Ok(None);
        }

        let row_count = rows.len();
        let statement = if options.strict_columns && target.columns().is_none() {
            let bound = self.schema.bind(self.executor.pool(), target).await?;
            compile_update(&bound, rows, options)?
        } else {
            compile_update(target, rows, options)?
        };

        let affected = self.executor.execute(&statement).await?;
        info!(
            table = %target.qualified_table(),
            rows = row_count,
            affected,
            "Batched update applied"
        );
        Ok(Some(affected))
    }

    /// Updates the table of model `M`.
    pub async fn update_model<M, I>(&self, rows: I, options: &CompileOptions) -> Result<Option<u64>>
    where
        M: BatchModel,
        I: IntoIterator,
        I::Item: IntoRow,
    {
        let target = self.config.target_for::<M>();
        self.update(&target, rows, options).await
    }

    /// Updates the table of model `M` from model instances.
    ///
    /// Each model is serialized into a row; the lookup column comes from its
    /// serialized primary key field.
    pub async fn update_models<M, I>(&self, models: I, options: &CompileOptions) -> Result<Option<u64>>
    where
        M: BatchModel + Serialize,
        I: IntoIterator<Item = M>,
    {
        self.update_model::<M, _>(models.into_iter().map(Model), options)
            .await
    }
}
