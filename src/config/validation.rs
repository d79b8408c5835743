//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require at least one root route
//! - Check method tokens and regex patterns
//! - Reject nodes declaring both a path and a pattern
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Errors carry the node location, e.g. `routes[0].routes[2]`
//! - Unknown handler names are the resolver's concern, not validation's

use thiserror::Error;

use crate::config::schema::{RouteConfig, RoutesConfig};
use crate::routing::method::parse_method;
use crate::routing::path::PathPattern;

/// A single semantic problem in a route configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("at least one route is required")]
    NoRoutes,

    #[error("{location}: `path` and `pattern` are mutually exclusive")]
    PathAndPattern { location: String },

    #[error("{location}: invalid pattern {pattern:?}: {reason}")]
    InvalidPattern {
        location: String,
        pattern: String,
        reason: String,
    },

    #[error("{location}: invalid method {method:?}")]
    InvalidMethod { location: String, method: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RoutesConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    if let Some(method) = &config.defaults.method {
        if parse_method(method).is_err() {
            errors.push(ValidationError::InvalidMethod {
                location: "defaults".to_string(),
                method: method.clone(),
            });
        }
    }

    validate_routes("routes", &config.routes, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(prefix: &str, routes: &[RouteConfig], errors: &mut Vec<ValidationError>) {
    for (i, route) in routes.iter().enumerate() {
        let location = format!("{prefix}[{i}]");

        if route.path.is_some() && route.pattern.is_some() {
            errors.push(ValidationError::PathAndPattern {
                location: location.clone(),
            });
        }

        if let Some(pattern) = &route.pattern {
            if let Err(e) = PathPattern::new(pattern) {
                errors.push(ValidationError::InvalidPattern {
                    location: location.clone(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                });
            }
        }

        if let Some(method) = &route.method {
            if parse_method(method).is_err() {
                errors.push(ValidationError::InvalidMethod {
                    location: location.clone(),
                    method: method.clone(),
                });
            }
        }

        validate_routes(&format!("{location}.routes"), &route.routes, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(path: &str) -> RouteConfig {
        RouteConfig {
            path: Some(path.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let mut config = RoutesConfig::default();
        config.defaults.method = Some("get".into());
        config.routes.push(route("/api"));

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_routes() {
        let config = RoutesConfig::default();
        assert_eq!(validate_config(&config), Err(vec![ValidationError::NoRoutes]));
    }

    #[test]
    fn test_collects_nested_errors() {
        let mut bad = route("/x");
        bad.pattern = Some("(".into());
        bad.method = Some("not a verb".into());

        let mut parent = route("/api");
        parent.routes.push(route("ok"));
        parent.routes.push(bad);

        let mut config = RoutesConfig::default();
        config.defaults.method = Some("".into());
        config.routes.push(parent);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors[0],
            ValidationError::InvalidMethod {
                location: "defaults".into(),
                method: "".into()
            }
        );
        assert_eq!(
            errors[1],
            ValidationError::PathAndPattern {
                location: "routes[0].routes[1]".into()
            }
        );
        assert!(matches!(errors[2], ValidationError::InvalidPattern { .. }));
        assert!(matches!(
            &errors[3],
            ValidationError::InvalidMethod { location, .. } if location == "routes[0].routes[1]"
        ));
    }
}
