//! The batched `CASE` update compiler.
//!
//! Given rows `[{id: 1, name: "Ann"}, {id: 2, name: "Bo"}]` on `users`, the
//! compiler produces:
//!
//! ```text
//! UPDATE "users" SET `name` = (CASE
//! WHEN `id` = '1' THEN 'Ann'
//! WHEN `id` = '2' THEN 'Bo'
//! ELSE `name` END) WHERE "id" IN('1','2');
//! ```
//!
//! One `CASE` block per touched column, in first-seen order; one `WHEN`
//! branch per row touching that column, in row order.

use core::fmt;
use core::fmt::Write as _;
use std::collections::HashMap;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDateTime, Utc};
use serde_json::Value;
use tracing::debug;

use super::row::{IncrementOp, IntoRow, Row, RowValue};
use super::value::SqlValue;
use crate::dialect::{LiteralStyle, QuoteStyle};
use crate::error::{BatchError, Result, UpdateError};
use crate::escape::{escape_scalar, escape_text};
use crate::executor::Executor;
use crate::schema::Target;

type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Options of a single compile call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Column matched by each `WHEN` branch. Defaults to the target's
    /// primary key.
    pub lookup_column: Option<String>,
    /// Emit escaped values without single-quote wrapping.
    pub raw: bool,
    /// Reject columns the target does not know.
    pub strict_columns: bool,
}

impl CompileOptions {
    /// Default options: primary key lookup, quoted values, no column checks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches rows on `column` instead of the primary key.
    #[must_use]
    pub fn lookup_column(mut self, column: impl Into<String>) -> Self {
        self.lookup_column = Some(column.into());
        self
    }

    /// Enables or disables raw mode.
    #[must_use]
    pub const fn raw(mut self, enabled: bool) -> Self {
        self.raw = enabled;
        self
    }

    /// Enables or disables strict column checking.
    #[must_use]
    pub const fn strict_columns(mut self, enabled: bool) -> Self {
        self.strict_columns = enabled;
        self
    }
}

/// A compiled batched update.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    sql: String,
    keys: Vec<SqlValue>,
}

impl CompiledStatement {
    /// Returns the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the row keys of the `IN (...)` list, in row order.
    #[must_use]
    pub fn keys(&self) -> &[SqlValue] {
        &self.keys
    }

    /// Consumes the statement, returning the SQL text.
    #[must_use]
    pub fn into_sql(self) -> String {
        self.sql
    }
}

impl fmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl AsRef<str> for CompiledStatement {
    fn as_ref(&self) -> &str {
        &self.sql
    }
}

/// `WHEN` branches accumulated for one column.
#[derive(Debug)]
struct ColumnCases {
    column: String,
    branches: Vec<String>,
}

/// Compiles many row updates into one `UPDATE ... SET col = (CASE ...)`
/// statement.
///
/// A compiler borrows its [`Target`] and can be reused; every call to
/// [`compile`](Self::compile) starts from empty accumulators.
///
/// # Example
///
/// ```rust
/// use oxide_batch_core::builder::{BatchCompiler, CompileOptions, Row};
/// use oxide_batch_core::schema::Target;
///
/// let target = Target::new("users", "id");
/// let mut compiler = BatchCompiler::new(&target);
/// let statement = compiler
///     .compile(
///         [Row::new().set("id", 1).set("name", "Ann")],
///         &CompileOptions::new(),
///     )
///     .unwrap();
///
/// assert!(statement.sql().starts_with("UPDATE \"users\" SET `name` = (CASE"));
/// ```
pub struct BatchCompiler<'t> {
    target: &'t Target,
    quote: QuoteStyle,
    literals: LiteralStyle,
    cases: Vec<ColumnCases>,
    positions: HashMap<String, usize>,
    keys: Vec<SqlValue>,
    compiled: Option<CompiledStatement>,
    clock: Clock,
}

impl fmt::Debug for BatchCompiler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchCompiler")
            .field("target", &self.target)
            .field("quote", &self.quote)
            .field("literals", &self.literals)
            .field("cases", &self.cases)
            .field("keys", &self.keys)
            .field("compiled", &self.compiled)
            .finish_non_exhaustive()
    }
}

impl<'t> BatchCompiler<'t> {
    /// Creates a compiler for `target`.
    #[must_use]
    pub fn new(target: &'t Target) -> Self {
        Self {
            target,
            quote: target.quote_style(),
            literals: target.sql_dialect().literal_style(),
            cases: Vec::new(),
            positions: HashMap::new(),
            keys: Vec::new(),
            compiled: None,
            clock: Box::new(|| Utc::now().naive_utc()),
        }
    }

    /// Replaces the clock used for timestamp injection.
    #[must_use]
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDateTime + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    /// Returns the target.
    #[must_use]
    pub const fn target(&self) -> &'t Target {
        self.target
    }

    /// Returns the statement produced by the last successful compile.
    #[must_use]
    pub const fn compiled_query(&self) -> Option<&CompiledStatement> {
        self.compiled.as_ref()
    }

    /// Compiles `rows` into a single batched update.
    ///
    /// Rows are processed in order. Any error aborts the call and leaves no
    /// compiled statement behind.
    ///
    /// # Errors
    ///
    /// - [`BatchError::EmptyInput`] when `rows` is empty.
    /// - [`BatchError::MissingLookupValue`] when a row has no scalar value
    ///   for the lookup column.
    /// - [`BatchError::UnknownColumn`] / [`BatchError::ColumnsUnavailable`]
    ///   in strict mode.
    /// - [`BatchError::InvalidIncrementOperation`] for malformed
    ///   `[operator, operand]` values.
    /// - [`BatchError::CastableValue`] when a castable column gets a
    ///   structured value.
    /// - [`BatchError::InvalidDateFormat`] when the target injects timestamps
    ///   with a format chrono cannot render.
    /// - [`BatchError::NothingToUpdate`] when no row carries a column besides
    ///   the lookup column.
    /// - Row normalization errors from [`IntoRow`].
    pub fn compile<I>(&mut self, rows: I, options: &CompileOptions) -> Result<&CompiledStatement>
    where
        I: IntoIterator,
        I::Item: IntoRow,
    {
        self.reset();

        let rows = rows
            .into_iter()
            .map(IntoRow::into_row)
            .collect::<Result<Vec<_>>>()?;
        if rows.is_empty() {
            return Err(BatchError::EmptyInput);
        }

        let target = self.target;
        if let Some(timestamps) = target.timestamp_settings() {
            validate_date_format(&timestamps.date_format)?;
        }
        let lookup = options
            .lookup_column
            .as_deref()
            .unwrap_or_else(|| target.primary_key());
        let known_columns = if options.strict_columns {
            Some(
                target
                    .columns()
                    .ok_or_else(|| BatchError::ColumnsUnavailable {
                        table: target.table().to_owned(),
                    })?,
            )
        } else {
            None
        };

        let row_count = rows.len();
        let quoted_lookup = self.quote.quote(lookup);
        let mut key_literals = Vec::with_capacity(row_count);

        for (index, mut row) in rows.into_iter().enumerate() {
            let key = match row.get(lookup) {
                Some(RowValue::Scalar(value)) if !value.is_null() => value.clone(),
                _ => {
                    self.reset();
                    return Err(BatchError::MissingLookupValue {
                        column: lookup.to_owned(),
                        row: index,
                    });
                }
            };
            let key_literal = escape_scalar(&key, self.literals).unwrap_or_default();

            let accumulated = self.inject_timestamp(&mut row).and_then(|()| {
                self.accumulate(&row, lookup, &quoted_lookup, &key_literal, known_columns, options.raw)
            });
            if let Err(e) = accumulated {
                self.reset();
                return Err(e);
            }

            self.keys.push(key);
            key_literals.push(key_literal);
        }

        if self.cases.is_empty() {
            self.reset();
            return Err(BatchError::NothingToUpdate {
                column: lookup.to_owned(),
            });
        }

        let sql = self.render_statement(lookup, &key_literals);
        debug!(
            table = %target.qualified_table(),
            rows = row_count,
            columns = self.cases.len(),
            "Compiled batched update"
        );

        Ok(&*self.compiled.insert(CompiledStatement {
            sql,
            keys: self.keys.clone(),
        }))
    }

    /// Compiles `rows` and hands the statement to `executor`.
    ///
    /// Returns `Ok(None)` without touching the executor when `rows` is empty.
    ///
    /// # Errors
    ///
    /// [`UpdateError::Compile`] for anything [`compile`](Self::compile)
    /// rejects, [`UpdateError::Execute`] with the executor's own error.
    pub fn update<E, I>(
        &mut self,
        executor: &mut E,
        rows: I,
        options: &CompileOptions,
    ) -> std::result::Result<Option<E::Output>, UpdateError<E::Error>>
    where
        E: Executor,
        I: IntoIterator,
        I::Item: IntoRow,
    {
        let mut rows = rows.into_iter().peekable();
        if rows.peek().is_none() {
            debug!(table = %self.target.qualified_table(), "No rows supplied, nothing to update");
            return Ok(None);
        }

        let sql = self.compile(rows, options)?.sql().to_owned();
        executor.execute(&sql).map(Some).map_err(UpdateError::Execute)
    }

    fn reset(&mut self) {
        self.cases.clear();
        self.positions.clear();
        self.keys.clear();
        self.compiled = None;
    }

    fn inject_timestamp(&self, row: &mut Row) -> Result<()> {
        let Some(timestamps) = self.target.timestamp_settings() else {
            return Ok(());
        };
        let supplied = row
            .get(&timestamps.column)
            .is_some_and(|value| !matches!(value, RowValue::Scalar(SqlValue::Null)));
        if !supplied {
            let mut now = String::new();
            write!(now, "{}", (self.clock)().format(&timestamps.date_format)).map_err(|_| {
                BatchError::InvalidDateFormat {
                    format: timestamps.date_format.clone(),
                }
            })?;
            row.insert(timestamps.column.as_str(), RowValue::Scalar(SqlValue::Text(now)));
        }
        Ok(())
    }

    fn accumulate(
        &mut self,
        row: &Row,
        lookup: &str,
        quoted_lookup: &str,
        key_literal: &str,
        known_columns: Option<&[String]>,
        raw: bool,
    ) -> Result<()> {
        for (column, value) in row.iter() {
            if let Some(known) = known_columns {
                if !known.iter().any(|c| c == column) {
                    return Err(BatchError::UnknownColumn {
                        column: column.to_owned(),
                        table: self.target.table().to_owned(),
                    });
                }
            }

            if column == lookup {
                continue;
            }

            let rendered = self.render_value(column, value, raw)?;
            self.push_branch(
                column,
                format!("WHEN {quoted_lookup} = '{key_literal}' THEN {rendered}"),
            );
        }
        Ok(())
    }

    fn render_value(&self, column: &str, value: &RowValue, raw: bool) -> Result<String> {
        match value {
            RowValue::Increment(op) => Ok(self.render_increment(column, op)),
            RowValue::Scalar(scalar) => Ok(render_literal(scalar, self.literals, raw)),
            RowValue::Json(Value::Array(items)) => match IncrementOp::from_json(items) {
                Ok(op) => Ok(self.render_increment(column, &op)),
                Err(_) if self.target.is_castable(column) => Err(BatchError::CastableValue {
                    column: column.to_owned(),
                    kind: value.kind(),
                }),
                Err(reason) => Err(BatchError::InvalidIncrementOperation {
                    column: column.to_owned(),
                    reason,
                }),
            },
            RowValue::Json(json @ Value::Object(_)) => {
                if self.target.is_castable(column) {
                    return Err(BatchError::CastableValue {
                        column: column.to_owned(),
                        kind: value.kind(),
                    });
                }
                let escaped = escape_text(&json.to_string(), self.literals).into_owned();
                Ok(quote_literal(escaped, raw))
            }
            RowValue::Json(json) => {
                let scalar = SqlValue::from_json(json).unwrap_or(SqlValue::Null);
                Ok(render_literal(&scalar, self.literals, raw))
            }
        }
    }

    fn render_increment(&self, column: &str, op: &IncrementOp) -> String {
        let column = self.quote.quote(column);
        if op.operand.is_negative() {
            // `col--2` would open a line comment.
            format!("{column}{}({})", op.operator, op.operand)
        } else {
            format!("{column}{}{}", op.operator, op.operand)
        }
    }

    fn push_branch(&mut self, column: &str, branch: String) {
        let index = match self.positions.get(column) {
            Some(&index) => index,
            None => {
                self.cases.push(ColumnCases {
                    column: column.to_owned(),
                    branches: Vec::new(),
                });
                self.positions.insert(column.to_owned(), self.cases.len() - 1);
                self.cases.len() - 1
            }
        };
        self.cases[index].branches.push(branch);
    }

    fn render_statement(&self, lookup: &str, key_literals: &[String]) -> String {
        let blocks = self
            .cases
            .iter()
            .map(|cases| {
                let column = self.quote.quote(&cases.column);
                format!(
                    "{column} = (CASE\n{}\nELSE {column} END)",
                    cases.branches.join("\n")
                )
            })
            .collect::<Vec<_>>()
            .join("\n,");

        let keys = key_literals
            .iter()
            .map(|key| format!("'{key}'"))
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "UPDATE {} SET {blocks} WHERE {} IN({keys});",
            QuoteStyle::DoubleQuote.quote(&self.target.qualified_table()),
            QuoteStyle::DoubleQuote.quote(lookup),
        )
    }
}

fn render_literal(value: &SqlValue, style: LiteralStyle, raw: bool) -> String {
    escape_scalar(value, style)
        .map_or_else(|| String::from("NULL"), |escaped| quote_literal(escaped, raw))
}

fn validate_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(BatchError::InvalidDateFormat {
            format: format.to_owned(),
        });
    }
    Ok(())
}

fn quote_literal(escaped: String, raw: bool) -> String {
    if raw {
        escaped
    } else {
        format!("'{escaped}'")
    }
}

/// Compiles `rows` against `target` with a fresh compiler.
///
/// # Errors
///
/// See [`BatchCompiler::compile`].
pub fn compile_update<I>(target: &Target, rows: I, options: &CompileOptions) -> Result<CompiledStatement>
where
    I: IntoIterator,
    I::Item: IntoRow,
{
    BatchCompiler::new(target).compile(rows, options).cloned()
}
