//! Error types for batch compilation.

use thiserror::Error;

use crate::builder::IncrementError;

/// Errors raised while compiling a batched update.
///
/// Every variant aborts the whole compile call; no partial statement is ever
/// produced.
#[derive(Debug, Error)]
pub enum BatchError {
    /// No rows were supplied.
    #[error("no rows were supplied")]
    EmptyInput,

    /// A row has no usable value for the lookup column.
    #[error("row {row} has no value for lookup column [{column}]")]
    MissingLookupValue {
        /// The lookup column.
        column: String,
        /// Zero-based position of the row in the input.
        row: usize,
    },

    /// A value looked like an increment/decrement directive but is malformed.
    #[error(
        "invalid increment/decrement for column [{column}]: {reason}; \
         expected a math operator [+, -, *, /, %] and a number"
    )]
    InvalidIncrementOperation {
        /// The column carrying the directive.
        column: String,
        /// What was wrong with it.
        reason: IncrementError,
    },

    /// Strict mode found a column the target does not know.
    #[error("there is no column with name [{column}] on table [{table}]")]
    UnknownColumn {
        /// The unknown column.
        column: String,
        /// The table.
        table: String,
    },

    /// Strict mode was requested but the target carries no column list.
    #[error("strict column checking needs the known columns of table [{table}]")]
    ColumnsUnavailable {
        /// The table.
        table: String,
    },

    /// A castable column received a structured value.
    #[error("castable attributes must be provided as scalar values, [{kind}] for [{column}] is invalid")]
    CastableValue {
        /// The castable column.
        column: String,
        /// Shape of the rejected value.
        kind: &'static str,
    },

    /// The rows carry nothing to update besides the lookup column.
    #[error("no columns to update besides lookup column [{column}]")]
    NothingToUpdate {
        /// The lookup column.
        column: String,
    },

    /// The timestamp column's date format has an invalid specifier.
    #[error("invalid date format [{format}] for the timestamp column")]
    InvalidDateFormat {
        /// The rejected format string.
        format: String,
    },

    /// An input could not be read as a row.
    #[error("a row must be a JSON object, got {kind}")]
    InvalidRow {
        /// Shape of the rejected input.
        kind: &'static str,
    },

    /// A model failed to serialize into a row.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for batch compilation.
pub type Result<T> = std::result::Result<T, BatchError>;

/// Error returned by [`crate::builder::BatchCompiler::update`].
///
/// Execution errors are handed back untouched in [`UpdateError::Execute`].
#[derive(Debug, Error)]
pub enum UpdateError<E> {
    /// Compilation failed; nothing was executed.
    #[error(transparent)]
    Compile(#[from] BatchError),

    /// The executor failed.
    #[error("{0}")]
    Execute(E),
}
