//! SQL dialect support.
//!
//! Two things of a batched update depend on the dialect: how column
//! identifiers inside the `CASE` blocks are quoted, and how quotes inside
//! string literals are escaped. The dialect is resolved once, when a
//! [`crate::schema::Target`] is built, and both are plain switches over
//! [`Dialect`].

mod literal;
mod quote;

pub use literal::LiteralStyle;
pub use quote::QuoteStyle;

use core::fmt;

use serde::{Deserialize, Serialize};

/// A database dialect.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL.
    MySql,
    /// MariaDB.
    MariaDb,
    /// SQLite.
    Sqlite,
    /// PostgreSQL.
    Postgres,
    /// Microsoft SQL Server.
    SqlServer,
    /// Anything else.
    #[default]
    Generic,
}

impl Dialect {
    /// Resolves a dialect from a connection driver name.
    ///
    /// Matching is case-insensitive. Unknown drivers resolve to
    /// [`Dialect::Generic`].
    #[must_use]
    pub fn from_driver(driver: &str) -> Self {
        match driver.trim().to_ascii_lowercase().as_str() {
            "mysql" => Self::MySql,
            "mariadb" => Self::MariaDb,
            "sqlite" | "sqlite3" => Self::Sqlite,
            "pgsql" | "postgres" | "postgresql" => Self::Postgres,
            "sqlsrv" | "mssql" | "sqlserver" => Self::SqlServer,
            _ => Self::Generic,
        }
    }

    /// Returns the name of the dialect.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::MariaDb => "mariadb",
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::SqlServer => "sqlserver",
            Self::Generic => "generic",
        }
    }

    /// Returns how column identifiers are quoted.
    ///
    /// PostgreSQL gets ANSI double quotes and SQL Server gets brackets. Every
    /// other dialect, unknown ones included, gets backticks.
    #[must_use]
    pub const fn quote_style(self) -> QuoteStyle {
        match self {
            Self::Postgres => QuoteStyle::DoubleQuote,
            Self::SqlServer => QuoteStyle::Bracket,
            Self::MySql | Self::MariaDb | Self::Sqlite | Self::Generic => QuoteStyle::Backtick,
        }
    }

    /// Returns how string literals are escaped.
    ///
    /// MySQL, MariaDB and unknown dialects read backslash escapes. SQLite,
    /// PostgreSQL (with `standard_conforming_strings`) and SQL Server only
    /// understand doubled quotes.
    #[must_use]
    pub const fn literal_style(self) -> LiteralStyle {
        match self {
            Self::MySql | Self::MariaDb | Self::Generic => LiteralStyle::Backslash,
            Self::Sqlite | Self::Postgres | Self::SqlServer => LiteralStyle::QuoteDoubling,
        }
    }

    /// Quotes an identifier in this dialect's style.
    #[must_use]
    pub fn quote_identifier(self, name: &str) -> String {
        self.quote_style().quote(name)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
