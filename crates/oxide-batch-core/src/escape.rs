//! Value escaping for inlined SQL literals.
//!
//! Batched updates inline every value, so these functions are the only thing
//! standing between row data and the statement text. Every function takes the
//! target's [`LiteralStyle`]:
//!
//! - [`LiteralStyle::Backslash`] escapes free text with backslash pairs
//!   (`\\`, `\0`, `\n`, `\r`, `\'`, `\"`, `\Z`).
//! - [`LiteralStyle::QuoteDoubling`] doubles single quotes and leaves every
//!   other character alone.
//!
//! Text that holds a JSON document is re-serialized instead, with single
//! quotes in every string doubled, so that JSON columns keep valid JSON.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::builder::SqlValue;
use crate::dialect::LiteralStyle;

/// Escapes a scalar for use inside a single-quoted literal.
///
/// Returns `None` for `NULL`, which has no literal form. Booleans become
/// `1` / `0`, numbers and the empty string are returned as-is.
#[must_use]
pub fn escape_scalar(value: &SqlValue, style: LiteralStyle) -> Option<String> {
    match value {
        SqlValue::Null => None,
        SqlValue::Bool(b) => Some(String::from(if *b { "1" } else { "0" })),
        SqlValue::Int(n) => Some(n.to_string()),
        SqlValue::Float(x) => Some(x.to_string()),
        SqlValue::Text(s) => Some(escape_text(s, style).into_owned()),
    }
}

/// Escapes text: JSON documents are sanitized, anything else gets the
/// style's quote escaping.
#[must_use]
pub fn escape_text(text: &str, style: LiteralStyle) -> Cow<'_, str> {
    if is_json(text) {
        Cow::Owned(sanitize_json(text, style))
    } else {
        match style {
            LiteralStyle::Backslash => escape_backslashes(text),
            LiteralStyle::QuoteDoubling => double_quotes(text),
        }
    }
}

/// Escapes a structured value element by element.
///
/// Sequences and object values are escaped recursively, string leaves go
/// through [`escape_text`] and booleans become `"1"` / `"0"`. Numbers and
/// `null` are left alone.
#[must_use]
pub fn escape_value(value: &Value, style: LiteralStyle) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|v| escape_value(v, style)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), escape_value(v, style)))
                .collect(),
        ),
        Value::Bool(b) => Value::String(String::from(if *b { "1" } else { "0" })),
        Value::String(s) => Value::String(escape_text(s, style).into_owned()),
        Value::Null | Value::Number(_) => value.clone(),
    }
}

/// Returns whether `text` should be treated as a JSON document.
///
/// Numeric text never is. Otherwise the text must parse and decode to
/// something whose literal form differs from the source: a non-empty object
/// or array, or a non-empty JSON string. `true`, `false`, `null`, `[]`, `{}`
/// and `""` do not count.
#[must_use]
pub fn is_json(text: &str) -> bool {
    if is_numeric(text) {
        return false;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => !map.is_empty(),
        Ok(Value::Array(items)) => !items.is_empty(),
        Ok(Value::String(s)) => !s.is_empty(),
        _ => false,
    }
}

/// Re-serializes a JSON document so it can sit inside a single-quoted
/// literal.
///
/// Single quotes in every string and key are doubled and unicode is left
/// unescaped. String leaves stay strings, even when they hold JSON
/// themselves. With [`LiteralStyle::Backslash`] the backslashes of the
/// serialized form are doubled as well, so a backslash-escaping parser reads
/// the document back unchanged.
///
/// Text that does not decode is escaped as plain text.
#[must_use]
pub fn sanitize_json(text: &str, style: LiteralStyle) -> String {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return match style {
            LiteralStyle::Backslash => escape_backslashes(text).into_owned(),
            LiteralStyle::QuoteDoubling => double_quotes(text).into_owned(),
        };
    };
    let serialized = sanitize(value).to_string();
    if style.escapes_backslashes() {
        serialized.replace('\\', "\\\\")
    } else {
        serialized
    }
}

fn sanitize(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(double_quotes(&s).into_owned()),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (double_quotes(&k).into_owned(), sanitize(v)))
                .collect::<Map<_, _>>(),
        ),
        other => other,
    }
}

fn double_quotes(s: &str) -> Cow<'_, str> {
    if s.contains('\'') {
        Cow::Owned(s.replace('\'', "''"))
    } else {
        Cow::Borrowed(s)
    }
}

fn escape_backslashes(text: &str) -> Cow<'_, str> {
    if !text.contains(&['\\', '\0', '\n', '\r', '\'', '"', '\x1a'][..]) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\0' => escaped.push_str("\\0"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\x1a' => escaped.push_str("\\Z"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

fn is_numeric(text: &str) -> bool {
    text.trim_start()
        .parse::<f64>()
        .is_ok_and(f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MYSQL: LiteralStyle = LiteralStyle::Backslash;
    const STANDARD: LiteralStyle = LiteralStyle::QuoteDoubling;

    #[test]
    fn test_escape_scalar_basics() {
        assert_eq!(escape_scalar(&SqlValue::Null, MYSQL), None);
        assert_eq!(escape_scalar(&SqlValue::Bool(true), MYSQL).as_deref(), Some("1"));
        assert_eq!(escape_scalar(&SqlValue::Bool(false), STANDARD).as_deref(), Some("0"));
        assert_eq!(escape_scalar(&SqlValue::Int(-4), MYSQL).as_deref(), Some("-4"));
        assert_eq!(escape_scalar(&SqlValue::Float(1.25), STANDARD).as_deref(), Some("1.25"));
        assert_eq!(
            escape_scalar(&SqlValue::Text(String::new()), MYSQL).as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape_text("O'Brien", MYSQL), "O\\'Brien");
        assert_eq!(escape_text("say \"hi\"", MYSQL), "say \\\"hi\\\"");
        assert_eq!(escape_text("a\\b", MYSQL), "a\\\\b");
        assert_eq!(escape_text("line\nnext\r", MYSQL), "line\\nnext\\r");
        assert_eq!(escape_text("nul\0sub\x1a", MYSQL), "nul\\0sub\\Z");
    }

    #[test]
    fn test_quote_doubling_leaves_backslashes_alone() {
        assert_eq!(escape_text("O'Brien", STANDARD), "O''Brien");
        assert_eq!(escape_text("a\\b", STANDARD), "a\\b");
        assert_eq!(escape_text("say \"hi\"\n", STANDARD), "say \"hi\"\n");
        assert_eq!(escape_text("''", STANDARD), "''''");
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(escape_text("plain", MYSQL), Cow::Borrowed("plain")));
        assert!(matches!(escape_text("a\\b", STANDARD), Cow::Borrowed("a\\b")));
    }

    #[test]
    fn test_sql_injection_prevention() {
        let escaped = escape_text("'; DROP TABLE users; --", MYSQL);
        assert_eq!(escaped, "\\'; DROP TABLE users; --");

        let escaped = escape_text("x' END) WHERE 1=1; --", STANDARD);
        assert_eq!(escaped, "x'' END) WHERE 1=1; --");
    }

    #[test]
    fn test_backslash_cannot_swallow_doubled_quote() {
        // A backslash is ordinary text here, so every quote stays paired.
        let escaped = escape_text("a\\' OR 1=1 --", STANDARD);
        assert_eq!(escaped, "a\\'' OR 1=1 --");
        assert_eq!(escaped.matches('\'').count() % 2, 0);
    }

    #[test]
    fn test_is_json() {
        assert!(is_json(r#"{"a": 1}"#));
        assert!(is_json("[1, 2]"));
        assert!(is_json(r#""quoted""#));
        assert!(!is_json("42"));
        assert!(!is_json("1e3"));
        assert!(!is_json("true"));
        assert!(!is_json("null"));
        assert!(!is_json("[]"));
        assert!(!is_json("{}"));
        assert!(!is_json("plain text"));
        assert!(!is_json(r#"{"broken": "#));
    }

    #[test]
    fn test_sanitize_json_doubles_single_quotes() {
        let text = r#"{"it's": "Bob's", "n": 3, "list": ["a'b"]}"#;
        let expected = r#"{"it''s":"Bob''s","n":3,"list":["a''b"]}"#;
        assert_eq!(sanitize_json(text, MYSQL), expected);
        assert_eq!(sanitize_json(text, STANDARD), expected);
    }

    #[test]
    fn test_sanitize_json_backslashes_follow_style() {
        let text = r#"{"path": "C:\\temp", "q": "say \"hi\""}"#;
        assert_eq!(
            sanitize_json(text, MYSQL),
            r#"{"path":"C:\\\\temp","q":"say \\"hi\\""}"#
        );
        assert_eq!(
            sanitize_json(text, STANDARD),
            r#"{"path":"C:\\temp","q":"say \"hi\""}"#
        );
    }

    #[test]
    fn test_sanitize_json_keeps_nested_json_strings_as_strings() {
        let text = r#"{"inner": "{\"it's\": 1}"}"#;
        let sanitized = sanitize_json(text, STANDARD);
        assert_eq!(sanitized, r#"{"inner":"{\"it''s\": 1}"}"#);

        let decoded: Value = serde_json::from_str(&sanitized.replace("''", "'")).unwrap();
        assert!(decoded["inner"].is_string());
        assert_eq!(decoded["inner"], json!("{\"it's\": 1}"));
    }

    #[test]
    fn test_sanitize_json_keeps_unicode() {
        assert_eq!(sanitize_json(r#"{"name": "Zoë ☕"}"#, MYSQL), r#"{"name":"Zoë ☕"}"#);
    }

    #[test]
    fn test_sanitize_json_degrades_on_malformed() {
        assert_eq!(sanitize_json("{not json", MYSQL), "{not json");
        assert_eq!(sanitize_json("{it's", MYSQL), "{it\\'s");
        assert_eq!(sanitize_json("{it's", STANDARD), "{it''s");
    }

    #[test]
    fn test_json_text_goes_through_sanitizer() {
        let value = SqlValue::Text(String::from(r#"{"note": "don't"}"#));
        assert_eq!(
            escape_scalar(&value, MYSQL).as_deref(),
            Some(r#"{"note":"don''t"}"#)
        );
    }

    #[test]
    fn test_escape_value_recurses() {
        let escaped = escape_value(&json!(["it's", true, 3, null, ["a\"b"]]), MYSQL);
        assert_eq!(escaped, json!(["it\\'s", "1", 3, null, ["a\\\"b"]]));

        let escaped = escape_value(&json!({"a": ["it's", false]}), STANDARD);
        assert_eq!(escaped, json!({"a": ["it''s", "0"]}));
    }
}
