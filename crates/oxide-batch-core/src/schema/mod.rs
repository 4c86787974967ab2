//! Target descriptors and model metadata.
//!
//! A [`Target`] tells the compiler which table it updates, which column keys
//! the rows, and which columns get special treatment. It can be built by hand
//! or derived from a struct with `#[derive(BatchModel)]` from
//! `oxide-batch-derive`.

mod target;

pub use target::{Target, Timestamps};

use std::collections::HashMap;

use crate::dialect::Dialect;

/// Default `chrono` format for injected timestamps.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Static metadata of a model that can be batch-updated.
///
/// Implemented by `#[derive(BatchModel)]`.
pub trait BatchModel {
    /// The SQL table name.
    const TABLE: &'static str;

    /// The primary key column name.
    const PRIMARY_KEY: &'static str;

    /// List of all column names.
    const COLUMNS: &'static [&'static str];

    /// The auto-updated timestamp column, if the model uses timestamps.
    const UPDATED_AT: Option<&'static str> = None;

    /// Format of injected timestamps.
    const DATE_FORMAT: &'static str = DEFAULT_DATE_FORMAT;

    /// Columns holding serialized structures.
    const CASTABLE: &'static [&'static str] = &[];

    /// Builds the [`Target`] describing this model.
    #[must_use]
    fn target(dialect: Dialect) -> Target {
        let target = Target::new(Self::TABLE, Self::PRIMARY_KEY)
            .dialect(dialect)
            .known_columns(Self::COLUMNS.iter().copied())
            .castable(Self::CASTABLE.iter().copied());
        match Self::UPDATED_AT {
            Some(column) => target.timestamps(column, Self::DATE_FORMAT),
            None => target,
        }
    }
}

/// Per-table column listings, owned by whoever loads them.
///
/// Column listings are only needed for strict column checking and usually
/// come from schema introspection, so callers keep one cache per connection
/// and hand its listings to targets.
#[derive(Debug, Default, Clone)]
pub struct ColumnCache {
    tables: HashMap<String, Vec<String>>,
}

impl ColumnCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached columns of `table`.
    #[must_use]
    pub fn get(&self, table: &str) -> Option<&[String]> {
        self.tables.get(table).map(Vec::as_slice)
    }

    /// Stores the columns of `table`, replacing any previous listing.
    pub fn insert(&mut self, table: impl Into<String>, columns: Vec<String>) {
        self.tables.insert(table.into(), columns);
    }

    /// Returns the cached columns of `table`, loading them on a miss.
    ///
    /// # Errors
    ///
    /// Returns the loader's error; nothing is cached in that case.
    pub fn get_or_try_load<E, F>(&mut self, table: &str, load: F) -> Result<&[String], E>
    where
        F: FnOnce() -> Result<Vec<String>, E>,
    {
        if !self.tables.contains_key(table) {
            let columns = load()?;
            self.tables.insert(table.to_owned(), columns);
        }
        Ok(self.get(table).unwrap_or_default())
    }

    /// Forgets the listing of `table`.
    pub fn invalidate(&mut self, table: &str) {
        self.tables.remove(table);
    }

    /// Forgets every listing.
    pub fn clear(&mut self) {
        self.tables.clear();
    }

    /// Returns a copy of `target` that knows the cached columns of its
    /// table, or `None` on a cache miss.
    #[must_use]
    pub fn bind(&self, target: &Target) -> Option<Target> {
        self.get(target.table())
            .map(|columns| target.clone().known_columns(columns.iter().cloned()))
    }
}
