//! Identifier quoting styles.

/// How identifiers are delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteStyle {
    /// `` `name` ``
    Backtick,
    /// `"name"`
    DoubleQuote,
    /// `[name]`
    Bracket,
}

impl QuoteStyle {
    /// Returns the opening and closing delimiters.
    #[must_use]
    pub const fn delimiters(self) -> (char, char) {
        match self {
            Self::Backtick => ('`', '`'),
            Self::DoubleQuote => ('"', '"'),
            Self::Bracket => ('[', ']'),
        }
    }

    /// Wraps an identifier in delimiters.
    ///
    /// A closing delimiter inside the name is doubled, so the name cannot
    /// terminate the quoted identifier early.
    #[must_use]
    pub fn quote(self, name: &str) -> String {
        let (open, close) = self.delimiters();
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(open);
        for c in name.chars() {
            if c == close {
                quoted.push(close);
            }
            quoted.push(c);
        }
        quoted.push(close);
        quoted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names() {
        assert_eq!(QuoteStyle::Backtick.quote("votes"), "`votes`");
        assert_eq!(QuoteStyle::DoubleQuote.quote("votes"), "\"votes\"");
        assert_eq!(QuoteStyle::Bracket.quote("votes"), "[votes]");
    }

    #[test]
    fn test_closing_delimiter_is_doubled() {
        assert_eq!(QuoteStyle::Backtick.quote("a`b"), "`a``b`");
        assert_eq!(QuoteStyle::DoubleQuote.quote("a\"b"), "\"a\"\"b\"");
        assert_eq!(QuoteStyle::Bracket.quote("a]b"), "[a]]b]");
        assert_eq!(QuoteStyle::Bracket.quote("a[b"), "[a[b]");
    }
}
