//! String literal escaping styles.

/// How a single quote inside a string literal is escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LiteralStyle {
    /// MySQL-style backslash pairs: `\'`, `\\`, `\n`, ...
    #[default]
    Backslash,
    /// Standard SQL: `'` becomes `''` and backslashes are ordinary
    /// characters.
    QuoteDoubling,
}

impl LiteralStyle {
    /// Returns whether a backslash starts an escape sequence in this style.
    #[must_use]
    pub const fn escapes_backslashes(self) -> bool {
        matches!(self, Self::Backslash)
    }
}
