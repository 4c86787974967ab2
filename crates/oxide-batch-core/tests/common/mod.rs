#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use oxide_batch_core::builder::{compile_update, CompileOptions, IntoRow};
use oxide_batch_core::{BatchError, Target};

pub fn compile<I>(target: &Target, rows: I) -> String
where
    I: IntoIterator,
    I::Item: IntoRow,
{
    compile_with(target, rows, &CompileOptions::new())
}

pub fn compile_with<I>(target: &Target, rows: I, options: &CompileOptions) -> String
where
    I: IntoIterator,
    I::Item: IntoRow,
{
    compile_update(target, rows, options)
        .unwrap_or_else(|e| panic!("Failed to compile: {e}"))
        .into_sql()
}

pub fn compile_err<I>(target: &Target, rows: I) -> BatchError
where
    I: IntoIterator,
    I::Item: IntoRow,
{
    compile_update(target, rows, &CompileOptions::new()).expect_err("Expected compile error")
}

pub fn fixed_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 30)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid date")
}

/// Returns the `WHEN` branches of the `CASE` block of `column`, quoted with
/// backticks.
pub fn branches<'a>(sql: &'a str, column: &str) -> Vec<&'a str> {
    let header = format!("`{column}` = (CASE\n");
    let footer = format!("\nELSE `{column}` END)");
    let start = sql
        .find(&header)
        .unwrap_or_else(|| panic!("No CASE block for {column} in {sql}"))
        + header.len();
    let end = start
        + sql[start..]
            .find(&footer)
            .unwrap_or_else(|| panic!("Unterminated CASE block for {column}"));
    sql[start..end].split('\n').collect()
}

/// Returns the inner text of the single-quoted `THEN` literal of a branch.
pub fn then_literal(branch: &str) -> &str {
    let (_, literal) = branch
        .split_once(" THEN '")
        .unwrap_or_else(|| panic!("Branch has no quoted literal: {branch}"));
    literal
        .strip_suffix('\'')
        .unwrap_or_else(|| panic!("Unterminated literal: {branch}"))
}

/// Reads a literal the way a backslash-escaping SQL parser does.
pub fn unescape_literal(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('0') => out.push('\0'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('Z') => out.push('\x1a'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            },
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            other => out.push(other),
        }
    }
    out
}
