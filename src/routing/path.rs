//! Route path composition.
//!
//! # Responsibilities
//! - Represent a route path as either literal text or an opaque pattern
//! - Compose a child fragment onto its parent's effective path
//!
//! # Design Decisions
//! - Literal paths concatenate with exactly one inserted separator
//! - A pattern on either side wins: the child value replaces the path wholesale
//! - No validation of separators beyond the single-insertion rule

use std::fmt;

use regex::Regex;

/// Path separator used for concatenation and word splitting.
pub const SEPARATOR: char = '/';

/// A compiled, opaque path pattern.
///
/// Patterns never compose with literal prefixes.
#[derive(Debug, Clone)]
pub struct PathPattern(Regex);

impl PathPattern {
    /// Compile a pattern from its source text.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.0
    }

    /// Returns true if the pattern matches the request path.
    pub fn is_match(&self, path: &str) -> bool {
        self.0.is_match(path)
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for PathPattern {}

impl From<Regex> for PathPattern {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

/// Effective path of a route: literal text or a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePath {
    Literal(String),
    Pattern(PathPattern),
}

impl RoutePath {
    /// The path every tree walk starts from.
    pub fn root() -> Self {
        RoutePath::Literal(String::new())
    }

    pub fn literal(path: impl Into<String>) -> Self {
        RoutePath::Literal(path.into())
    }

    pub fn pattern(pattern: impl Into<PathPattern>) -> Self {
        RoutePath::Pattern(pattern.into())
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            RoutePath::Literal(path) => Some(path),
            RoutePath::Pattern(_) => None,
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, RoutePath::Pattern(_))
    }

    /// Compose `child` onto this path.
    ///
    /// An absent or empty child inherits the parent path unchanged.
    pub fn compose(&self, child: Option<&RoutePath>) -> RoutePath {
        match (self, child) {
            (_, None) => self.clone(),
            (_, Some(RoutePath::Literal(fragment))) if fragment.is_empty() => self.clone(),
            (RoutePath::Literal(parent), Some(RoutePath::Literal(fragment))) => {
                let mut path = String::with_capacity(parent.len() + fragment.len() + 1);
                path.push_str(parent);
                if !fragment.starts_with(SEPARATOR) {
                    path.push(SEPARATOR);
                }
                path.push_str(fragment);
                RoutePath::Literal(path)
            }
            (_, Some(child)) => child.clone(),
        }
    }
}

impl Default for RoutePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutePath::Literal(path) => f.write_str(path),
            RoutePath::Pattern(pattern) => write!(f, "~{}", pattern.as_str()),
        }
    }
}

impl From<&str> for RoutePath {
    fn from(path: &str) -> Self {
        RoutePath::Literal(path.to_string())
    }
}

impl From<String> for RoutePath {
    fn from(path: String) -> Self {
        RoutePath::Literal(path)
    }
}

impl From<PathPattern> for RoutePath {
    fn from(pattern: PathPattern) -> Self {
        RoutePath::Pattern(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(path: &str) -> RoutePath {
        RoutePath::literal(path)
    }

    #[test]
    fn test_compose_inserts_single_separator() {
        assert_eq!(lit("/a").compose(Some(&lit("b"))), lit("/a/b"));
        assert_eq!(lit("/a").compose(Some(&lit("/b"))), lit("/a/b"));
    }

    #[test]
    fn test_compose_from_root() {
        assert_eq!(RoutePath::root().compose(Some(&lit("api"))), lit("/api"));
        assert_eq!(RoutePath::root().compose(Some(&lit("/api"))), lit("/api"));
    }

    #[test]
    fn test_absent_child_inherits_parent() {
        assert_eq!(lit("/a").compose(None), lit("/a"));

        let pattern = RoutePath::pattern(PathPattern::new("^/files/.*$").unwrap());
        assert_eq!(pattern.compose(None), pattern);
    }

    #[test]
    fn test_empty_child_inherits_parent() {
        assert_eq!(lit("/api").compose(Some(&lit(""))), lit("/api"));
        assert_eq!(RoutePath::root().compose(Some(&lit(""))), RoutePath::root());
    }

    #[test]
    fn test_no_separator_cleanup() {
        // Trailing separators on the parent are kept as-is.
        assert_eq!(lit("/a/").compose(Some(&lit("/b"))), lit("/a//b"));
    }

    #[test]
    fn test_pattern_child_replaces_literal_parent() {
        let pattern = RoutePath::pattern(PathPattern::new("^/v[0-9]+$").unwrap());
        assert_eq!(lit("/api").compose(Some(&pattern)), pattern);
    }

    #[test]
    fn test_literal_child_under_pattern_keeps_child_only() {
        let pattern = RoutePath::pattern(PathPattern::new("^/v[0-9]+$").unwrap());
        assert_eq!(pattern.compose(Some(&lit("users"))), lit("users"));
    }

    #[test]
    fn test_display() {
        let pattern = RoutePath::pattern(PathPattern::new("^/x$").unwrap());
        assert_eq!(pattern.to_string(), "~^/x$");
        assert_eq!(lit("/a/b").to_string(), "/a/b");
    }
}
