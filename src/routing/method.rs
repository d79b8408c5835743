//! HTTP method resolution.
//!
//! A node's method is its own, or the configured default. Ancestor
//! methods never apply to descendants.

use axum::http::method::InvalidMethod;
use axum::http::Method;

/// Compile-time defaults applied to nodes that omit an option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    pub method: Option<Method>,
}

impl Defaults {
    pub fn with_method(method: Method) -> Self {
        Self {
            method: Some(method),
        }
    }

    /// Effective method for a node declaring `own`.
    pub fn resolve(&self, own: Option<&Method>) -> Option<Method> {
        own.or(self.method.as_ref()).cloned()
    }
}

/// Parse a method name. Case-insensitive for the standard verbs; any other
/// valid token becomes an extension method.
pub fn parse_method(name: &str) -> Result<Method, InvalidMethod> {
    Method::from_bytes(name.trim().to_ascii_uppercase().as_bytes())
}
