//! # oxide-batch-core
//!
//! Compiles many single-row updates into one batched SQL statement.
//!
//! Each touched column becomes a `CASE` expression that picks the new value
//! by the row's lookup key, and a single `WHERE ... IN (...)` clause limits
//! the statement to the supplied keys:
//!
//! ```rust
//! use oxide_batch_core::builder::{compile_update, CompileOptions, Row};
//! use oxide_batch_core::schema::Target;
//!
//! let target = Target::new("users", "id");
//! let statement = compile_update(
//!     &target,
//!     [
//!         Row::new().set("id", 1).set("name", "Ann"),
//!         Row::new().set("id", 2).set("name", "Bo"),
//!     ],
//!     &CompileOptions::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     statement.sql(),
//!     "UPDATE \"users\" SET `name` = (CASE\n\
//!      WHEN `id` = '1' THEN 'Ann'\n\
//!      WHEN `id` = '2' THEN 'Bo'\n\
//!      ELSE `name` END) WHERE \"id\" IN('1','2');"
//! );
//! ```
//!
//! ## Escaping
//!
//! Values are inlined, not bound. Every value and every key goes through
//! [`escape`] first, in the literal style of the target's dialect:
//!
//! ```rust
//! use oxide_batch_core::dialect::LiteralStyle;
//! use oxide_batch_core::escape::escape_text;
//!
//! let payload = "'; DROP TABLE users; --";
//! assert_eq!(
//!     escape_text(payload, LiteralStyle::Backslash),
//!     "\\'; DROP TABLE users; --"
//! );
//! assert_eq!(
//!     escape_text(payload, LiteralStyle::QuoteDoubling),
//!     "''; DROP TABLE users; --"
//! );
//! ```
//!
//! Increments (`["+", 5]` in JSON rows, [`Row::increment`] otherwise) render
//! as `` `col`+5 `` and are never quoted. Negative operands are
//! parenthesized: `` `col`-(-2) ``.

pub mod builder;
pub mod config;
pub mod dialect;
pub mod error;
pub mod escape;
pub mod executor;
pub mod schema;

pub use builder::{
    compile_update, BatchCompiler, CompileOptions, CompiledStatement, IntoRow, Model, Row,
    RowValue, SqlValue, ToSqlValue,
};
pub use dialect::Dialect;
pub use error::{BatchError, Result, UpdateError};
pub use executor::Executor;
pub use schema::{BatchModel, ColumnCache, Target};
