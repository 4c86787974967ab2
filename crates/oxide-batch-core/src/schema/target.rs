//! The table a batched update is aimed at.

use crate::dialect::{Dialect, QuoteStyle};

use super::DEFAULT_DATE_FORMAT;

/// Auto-updated timestamp column of a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamps {
    /// Column that receives the current time.
    pub column: String,
    /// `chrono` format string used to render the time.
    pub date_format: String,
}

/// Describes the table being updated.
///
/// # Example
///
/// ```rust
/// use oxide_batch_core::dialect::Dialect;
/// use oxide_batch_core::schema::Target;
///
/// let target = Target::new("users", "id")
///     .prefix("app_")
///     .dialect(Dialect::Postgres)
///     .timestamps("updated_at", "%Y-%m-%d %H:%M:%S");
///
/// assert_eq!(target.qualified_table(), "app_users");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    table: String,
    prefix: String,
    primary_key: String,
    known_columns: Option<Vec<String>>,
    timestamps: Option<Timestamps>,
    castable: Vec<String>,
    dialect: Dialect,
}

impl Target {
    /// Creates a target for `table` keyed by `primary_key`.
    #[must_use]
    pub fn new(table: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            prefix: String::new(),
            primary_key: primary_key.into(),
            known_columns: None,
            timestamps: None,
            castable: Vec::new(),
            dialect: Dialect::default(),
        }
    }

    /// Sets the connection's table prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the dialect.
    #[must_use]
    pub const fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the columns used by strict column checking.
    #[must_use]
    pub fn known_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Enables timestamp injection into `column`, rendered with `date_format`.
    #[must_use]
    pub fn timestamps(mut self, column: impl Into<String>, date_format: impl Into<String>) -> Self {
        self.timestamps = Some(Timestamps {
            column: column.into(),
            date_format: date_format.into(),
        });
        self
    }

    /// Enables timestamp injection into `updated_at` with the default format.
    #[must_use]
    pub fn with_timestamps(self) -> Self {
        self.timestamps("updated_at", DEFAULT_DATE_FORMAT)
    }

    /// Marks columns that store serialized structures (JSON, arrays,
    /// objects). Such columns only accept scalar values or increments.
    #[must_use]
    pub fn castable<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.castable.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Returns the bare table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the prefixed table name.
    #[must_use]
    pub fn qualified_table(&self) -> String {
        format!("{}{}", self.prefix, self.table)
    }

    /// Returns the primary key column.
    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Returns the known columns, if any were provided.
    #[must_use]
    pub fn columns(&self) -> Option<&[String]> {
        self.known_columns.as_deref()
    }

    /// Returns whether the target knows `column`. Targets without a column
    /// list know nothing.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.known_columns
            .as_ref()
            .is_some_and(|columns| columns.iter().any(|c| c == column))
    }

    /// Returns the timestamp settings.
    #[must_use]
    pub const fn timestamp_settings(&self) -> Option<&Timestamps> {
        self.timestamps.as_ref()
    }

    /// Returns whether `column` is castable.
    #[must_use]
    pub fn is_castable(&self, column: &str) -> bool {
        self.castable.iter().any(|c| c == column)
    }

    /// Returns the dialect.
    #[must_use]
    pub const fn sql_dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the identifier quoting style of the dialect.
    #[must_use]
    pub const fn quote_style(&self) -> QuoteStyle {
        self.dialect.quote_style()
    }
}
