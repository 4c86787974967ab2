//! Row update descriptors.
//!
//! Every supported input shape (fluent [`Row`] values, JSON objects, any
//! `serde::Serialize` model) is normalized into a [`Row`] before the compiler
//! looks at it.

use core::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::value::{SqlValue, ToSqlValue};
use crate::error::{BatchError, Result};

/// Arithmetic operator of an increment/decrement directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
}

impl ArithmeticOp {
    /// Every supported operator, in display order.
    pub const ALL: [Self; 5] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Modulo,
    ];

    /// Returns the SQL symbol.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }

    /// Parses an operator symbol. Only the exact symbols are accepted.
    #[must_use]
    pub fn parse(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == symbol)
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric right-hand side of an increment/decrement directive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    /// Integer operand.
    Int(i64),
    /// Finite float operand.
    Float(f64),
}

impl Operand {
    /// Parses a numeric string such as `"5"` or `"-2.5"`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(n) = text.parse::<i64>() {
            return Some(Self::Int(n));
        }
        text.parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .map(Self::Float)
    }

    /// Reads a JSON number or numeric string.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int).or_else(|| {
                n.as_f64().filter(|x| x.is_finite()).map(Self::Float)
            }),
            Value::String(s) => Self::parse(s),
            _ => None,
        }
    }

    /// Returns whether the rendered operand starts with a minus sign,
    /// `-0.0` included.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Int(n) => *n < 0,
            Self::Float(x) => x.is_sign_negative(),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Operand {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Operand {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

/// Why a value could not be read as an increment/decrement directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IncrementError {
    /// The directive did not have exactly two elements.
    #[error("expected 2 values, got {0}")]
    Arity(usize),
    /// The first element is not a string from the operator set.
    #[error("first value must be a string math operator")]
    Operator,
    /// The second element is not numeric.
    #[error("second value must be numeric")]
    Operand,
}

/// "Apply `operator operand` to the column's current value".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncrementOp {
    /// The operator.
    pub operator: ArithmeticOp,
    /// The operand.
    pub operand: Operand,
}

impl IncrementOp {
    /// Creates a new directive.
    #[must_use]
    pub fn new(operator: ArithmeticOp, operand: impl Into<Operand>) -> Self {
        Self {
            operator,
            operand: operand.into(),
        }
    }

    /// Reads a `[operator, operand]` JSON pair.
    ///
    /// # Errors
    ///
    /// Returns an [`IncrementError`] when the pair is malformed. Nothing is
    /// coerced: `["%%", 5]`, `["+"]` and `["+", "five"]` are all rejected.
    pub fn from_json(items: &[Value]) -> core::result::Result<Self, IncrementError> {
        let [operator, operand] = items else {
            return Err(IncrementError::Arity(items.len()));
        };
        let operator = operator
            .as_str()
            .and_then(ArithmeticOp::parse)
            .ok_or(IncrementError::Operator)?;
        let operand = Operand::from_json(operand).ok_or(IncrementError::Operand)?;
        Ok(Self { operator, operand })
    }
}

/// A single column value inside a [`Row`].
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    /// A plain scalar, `NULL` included.
    Scalar(SqlValue),
    /// An increment/decrement directive.
    Increment(IncrementOp),
    /// A structured value.
    ///
    /// Arrays are classified by the compiler: a well-formed
    /// `[operator, operand]` pair is an increment, anything else is an
    /// error. Objects are stored as JSON text unless the column is castable.
    Json(Value),
}

impl RowValue {
    /// Returns a short name of the value's shape, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(v) => v.kind(),
            Self::Increment(_) => "increment",
            Self::Json(Value::Array(_)) => "array",
            Self::Json(Value::Object(_)) => "object",
            Self::Json(_) => "json",
        }
    }

    fn from_json(value: Value) -> Self {
        match SqlValue::from_json(&value) {
            Some(scalar) => Self::Scalar(scalar),
            None => Self::Json(value),
        }
    }
}

/// An ordered column → value mapping describing one row's changes.
///
/// Column order is insertion order; setting a column twice replaces the value
/// in place.
///
/// ```rust
/// use oxide_batch_core::builder::{ArithmeticOp, Row};
///
/// let row = Row::new()
///     .set("id", 7)
///     .set("title", "Hello")
///     .increment("views", ArithmeticOp::Add, 1);
/// assert_eq!(row.columns().collect::<Vec<_>>(), ["id", "title", "views"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, RowValue)>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets a scalar value.
    #[must_use]
    pub fn set<T: ToSqlValue>(mut self, column: &str, value: T) -> Self {
        self.insert(column, RowValue::Scalar(value.to_sql_value()));
        self
    }

    /// Sets an increment/decrement directive.
    #[must_use]
    pub fn increment(
        mut self,
        column: &str,
        operator: ArithmeticOp,
        operand: impl Into<Operand>,
    ) -> Self {
        self.insert(
            column,
            RowValue::Increment(IncrementOp::new(operator, operand)),
        );
        self
    }

    /// Sets a structured JSON value.
    #[must_use]
    pub fn json(mut self, column: &str, value: Value) -> Self {
        self.insert(column, RowValue::from_json(value));
        self
    }

    /// Inserts or replaces a value, keeping the column's original position.
    pub fn insert(&mut self, column: impl Into<String>, value: RowValue) {
        let column = column.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Returns the value of a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&RowValue> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Returns whether the row carries the column.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Iterates over column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    /// Iterates over `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValue)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a row from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidRow`] when `value` is not an object.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            Value::Null => Err(BatchError::InvalidRow { kind: "null" }),
            Value::Bool(_) => Err(BatchError::InvalidRow { kind: "bool" }),
            Value::Number(_) => Err(BatchError::InvalidRow { kind: "number" }),
            Value::String(_) => Err(BatchError::InvalidRow { kind: "string" }),
            Value::Array(_) => Err(BatchError::InvalidRow { kind: "array" }),
        }
    }

    /// Builds a row from a JSON map, keeping its key order.
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        map.into_iter()
            .map(|(column, value)| (column, RowValue::from_json(value)))
            .collect()
    }

    /// Builds a row from any serializable model.
    ///
    /// Field order follows the model's serialized field order; column names
    /// are the serialized field names.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Serialization`] if the model fails to serialize
    /// and [`BatchError::InvalidRow`] if it does not serialize to an object.
    pub fn from_serialize<T: Serialize + ?Sized>(model: &T) -> Result<Self> {
        Self::from_json(serde_json::to_value(model)?)
    }
}

impl FromIterator<(String, RowValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, RowValue)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

/// Conversion into the canonical [`Row`] shape.
pub trait IntoRow {
    /// Normalizes `self` into a row.
    ///
    /// # Errors
    ///
    /// Returns a [`BatchError`] when the input cannot describe a row.
    fn into_row(self) -> Result<Row>;
}

impl IntoRow for Row {
    fn into_row(self) -> Result<Row> {
        Ok(self)
    }
}

impl IntoRow for &Row {
    fn into_row(self) -> Result<Row> {
        Ok(self.clone())
    }
}

impl IntoRow for Value {
    fn into_row(self) -> Result<Row> {
        Row::from_json(self)
    }
}

impl IntoRow for Map<String, Value> {
    fn into_row(self) -> Result<Row> {
        Ok(Row::from_map(self))
    }
}

/// Wraps a serializable model so it can be passed wherever rows are
/// expected.
///
/// ```rust
/// use oxide_batch_core::builder::{compile_update, CompileOptions, Model};
/// use oxide_batch_core::schema::Target;
///
/// #[derive(serde::Serialize)]
/// struct Score {
///     id: u32,
///     points: i64,
/// }
///
/// let scores = [Score { id: 1, points: 10 }, Score { id: 2, points: 20 }];
/// let statement = compile_update(
///     &Target::new("scores", "id"),
///     scores.iter().map(Model),
///     &CompileOptions::new(),
/// )
/// .unwrap();
/// assert!(statement.sql().ends_with("IN('1','2');"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Model<T>(pub T);

impl<T: Serialize> IntoRow for Model<T> {
    fn into_row(self) -> Result<Row> {
        Row::from_serialize(&self.0)
    }
}
