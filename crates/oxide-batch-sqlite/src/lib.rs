//! # oxide-batch-sqlite
//!
//! Runs batched updates compiled by `oxide-batch-core` on SQLite through
//! `sqlx`.
//!
//! # How SQLite differs from other dialects
//!
//! - **Identifier quoting**: SQLite accepts backticks, so `CASE` blocks are
//!   quoted the same way as for MySQL.
//! - **[Type affinity]**: every value is inlined as a quoted literal.
//!   Comparisons and stores against `INTEGER` or `REAL` columns convert the
//!   literal back to a number.
//! - **String literals**: SQLite has no backslash escapes. Single quotes are
//!   doubled and backslashes are stored as written.
//! - **Negative operands**: `["-", -2]` renders as `` `col`-(-2) ``, since
//!   `--` starts a comment.
//! - **Column listings**: strict mode reads columns from
//!   [`pragma_table_info`].
//!
//! [Type affinity]: https://www.sqlite.org/datatype3.html
//! [`pragma_table_info`]: https://www.sqlite.org/pragma.html#pragma_table_info
//!
//! ## Example
//!
//! ```rust,no_run
//! use oxide_batch_core::builder::{CompileOptions, Row};
//! use oxide_batch_core::{Dialect, Target};
//! use oxide_batch_sqlite::BatchUpdater;
//! use sqlx::sqlite::SqlitePool;
//!
//! # async fn run() -> oxide_batch_sqlite::Result<()> {
//! let pool = SqlitePool::connect("sqlite://app.db").await?;
//! let updater = BatchUpdater::new(pool);
//! let target = Target::new("users", "id").dialect(Dialect::Sqlite);
//!
//! let affected = updater
//!     .update(
//!         &target,
//!         [
//!             Row::new().set("id", 1).set("name", "Ann"),
//!             Row::new().set("id", 2).set("name", "Bo"),
//!         ],
//!         &CompileOptions::new(),
//!     )
//!     .await?;
//! assert_eq!(affected, Some(2));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod executor;
pub mod schema;
pub mod updater;

pub use error::{Result, SqliteBatchError};
pub use executor::SqliteExecutor;
pub use schema::SchemaCache;
pub use updater::BatchUpdater;
