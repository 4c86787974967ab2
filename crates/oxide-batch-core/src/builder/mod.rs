//! Batched update builder
//!
//! Rows describe per-key changes; [`BatchCompiler`] folds them into one
//! `UPDATE` statement with a `CASE` block per column.
//!
//! # Example
//!
//! ```rust
//! use oxide_batch_core::builder::{compile_update, ArithmeticOp, CompileOptions, Row};
//! use oxide_batch_core::schema::Target;
//!
//! let target = Target::new("posts", "id");
//! let statement = compile_update(
//!     &target,
//!     [
//!         Row::new().set("id", 1).set("title", "Hello"),
//!         Row::new().set("id", 2).increment("views", ArithmeticOp::Add, 1),
//!     ],
//!     &CompileOptions::new(),
//! )
//! .unwrap();
//!
//! assert!(statement.sql().ends_with("WHERE \"id\" IN('1','2');"));
//! ```

mod compiler;
mod row;
pub mod value;

pub use compiler::{compile_update, BatchCompiler, CompileOptions, CompiledStatement};
pub use row::{ArithmeticOp, IncrementError, IncrementOp, IntoRow, Model, Operand, Row, RowValue};
pub use value::{SqlValue, ToSqlValue};
