//! Configuration schema definitions.
//!
//! A route tree can be declared in TOML. Handlers are referenced by name
//! and bound later by the resolver.
//!
//! ```toml
//! [defaults]
//! method = "get"
//!
//! [[routes]]
//! path = "/api"
//! pre = "auth"
//!
//! [[routes.routes]]
//! path = "users/:id"
//! action = "show_user"
//! post = ["audit", "notify"]
//! ```

use serde::{Deserialize, Serialize};

/// Root configuration for a route tree.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RoutesConfig {
    /// Options applied to routes that omit them.
    pub defaults: DefaultsConfig,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Root routes, in declaration order.
    pub routes: Vec<RouteConfig>,
}

/// Defaults for routes that omit an option.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Method used by registrable routes without their own.
    pub method: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (e.g. "info", "nested_routes=debug").
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
}

/// One node of the declared route tree.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RouteConfig {
    /// Literal path fragment, appended to the parent path.
    #[serde(default)]
    pub path: Option<String>,

    /// Regex path. Replaces the inherited path entirely.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Action handler name.
    #[serde(default)]
    pub action: Option<String>,

    /// Pre middleware name(s).
    #[serde(default)]
    pub pre: OneOrMany<String>,

    /// Post middleware name(s).
    #[serde(default)]
    pub post: OneOrMany<String>,

    /// Own HTTP method. Not inherited by child routes.
    #[serde(default)]
    pub method: Option<String>,

    /// Child routes.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// A single value or a list of values.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RoutesConfig::default();
        assert!(config.routes.is_empty());
        assert!(config.defaults.method.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_parse_nested_tree() {
        let config: RoutesConfig = toml::from_str(
            r#"
            [defaults]
            method = "post"

            [logging]
            format = "full"

            [[routes]]
            path = "/api"
            pre = "auth"

            [[routes.routes]]
            path = "users"
            method = "get"
            action = "list_users"
            post = ["audit", "notify"]
            "#,
        )
        .unwrap();

        assert_eq!(config.defaults.method.as_deref(), Some("post"));
        assert_eq!(config.logging.format, LogFormat::Full);

        let api = &config.routes[0];
        assert_eq!(api.pre.as_slice(), ["auth".to_string()]);
        assert!(api.action.is_none());

        let users = &api.routes[0];
        assert_eq!(users.action.as_deref(), Some("list_users"));
        assert_eq!(users.post, OneOrMany::Many(vec!["audit".into(), "notify".into()]));
        assert!(users.pre.is_empty());
    }

    #[test]
    fn test_one_or_many_into_vec() {
        assert_eq!(OneOrMany::One(1).into_vec(), vec![1]);
        assert_eq!(OneOrMany::Many(vec![1, 2]).into_vec(), vec![1, 2]);
        assert!(OneOrMany::<u8>::default().is_empty());
    }
}
