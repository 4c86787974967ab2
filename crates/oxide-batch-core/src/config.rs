//! Connection settings that shape compiled statements.

use serde::Deserialize;

use crate::dialect::Dialect;
use crate::schema::{BatchModel, Target};

/// The part of a connection's configuration the compiler cares about.
///
/// ```rust
/// use oxide_batch_core::config::ConnectionConfig;
/// use oxide_batch_core::dialect::Dialect;
///
/// let config: ConnectionConfig =
///     serde_json::from_str(r#"{"driver": "pgsql", "prefix": "app_"}"#).unwrap();
/// assert_eq!(config.dialect(), Dialect::Postgres);
/// assert_eq!(config.target("users", "id").qualified_table(), "app_users");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    /// Driver name, such as `mysql`, `pgsql`, `sqlite` or `sqlsrv`.
    #[serde(default)]
    pub driver: String,
    /// Prefix prepended to every table name.
    #[serde(default)]
    pub prefix: String,
}

impl ConnectionConfig {
    /// Creates a configuration for `driver` without a table prefix.
    #[must_use]
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            prefix: String::new(),
        }
    }

    /// Resolves the dialect of the driver.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        Dialect::from_driver(&self.driver)
    }

    /// Builds a target on this connection.
    #[must_use]
    pub fn target(&self, table: &str, primary_key: &str) -> Target {
        Target::new(table, primary_key)
            .prefix(self.prefix.as_str())
            .dialect(self.dialect())
    }

    /// Builds the target of model `M` on this connection.
    #[must_use]
    pub fn target_for<M: BatchModel>(&self) -> Target {
        M::target(self.dialect()).prefix(self.prefix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let config: ConnectionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.dialect(), Dialect::Generic);
        assert_eq!(config.prefix, "");
    }

    #[test]
    fn test_target_for_model() {
        struct Tag;
        impl BatchModel for Tag {
            const TABLE: &'static str = "tags";
            const PRIMARY_KEY: &'static str = "slug";
            const COLUMNS: &'static [&'static str] = &["slug", "label"];
        }

        let config = ConnectionConfig {
            driver: String::from("sqlsrv"),
            prefix: String::from("cms_"),
        };
        let target = config.target_for::<Tag>();
        assert_eq!(target.qualified_table(), "cms_tags");
        assert_eq!(target.primary_key(), "slug");
        assert_eq!(target.sql_dialect(), Dialect::SqlServer);
    }
}
