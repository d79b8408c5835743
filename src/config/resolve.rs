//! Binding configured handler names to handlers.
//!
//! # Responsibilities
//! - Look up pre middleware, actions and post middleware by name
//! - Turn a `RouteConfig` tree into `RouteNode`s ready for compilation
//!
//! # Design Decisions
//! - Single-or-many middleware lists are flattened here, once
//! - The first unknown name aborts resolution

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::config::schema::{DefaultsConfig, RouteConfig};
use crate::routing::method::{parse_method, Defaults};
use crate::routing::node::RouteNode;
use crate::routing::path::{PathPattern, RoutePath};
use crate::routing::post_chain::{Continuation, PostMiddleware};

/// Which kind of handler a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Pre,
    Action,
    Post,
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandlerKind::Pre => "pre middleware",
            HandlerKind::Action => "action",
            HandlerKind::Post => "post middleware",
        })
    }
}

/// Errors raised while binding names to handlers.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unknown {kind} {name:?}")]
    Unknown { kind: HandlerKind, name: String },

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid method {0:?}")]
    InvalidMethod(String),
}

/// Source of named handlers.
pub trait HandlerSource<P, A, T> {
    fn pre(&self, name: &str) -> Option<P>;
    fn action(&self, name: &str) -> Option<A>;
    fn post(&self, name: &str) -> Option<PostMiddleware<T>>;
}

/// Handlers registered by name.
pub struct HandlerRegistry<P, A, T> {
    pre: HashMap<String, P>,
    actions: HashMap<String, A>,
    post: HashMap<String, PostMiddleware<T>>,
}

impl<P, A, T> HandlerRegistry<P, A, T> {
    pub fn new() -> Self {
        Self {
            pre: HashMap::new(),
            actions: HashMap::new(),
            post: HashMap::new(),
        }
    }

    pub fn with_pre(mut self, name: impl Into<String>, middleware: P) -> Self {
        self.pre.insert(name.into(), middleware);
        self
    }

    pub fn with_action(mut self, name: impl Into<String>, action: A) -> Self {
        self.actions.insert(name.into(), action);
        self
    }

    /// Register a post middleware; the name doubles as its display name.
    pub fn with_post<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(T, Continuation<T>) + Send + Sync + 'static,
    {
        let name = name.into();
        let middleware = PostMiddleware::named(name.as_str(), f);
        self.post.insert(name, middleware);
        self
    }
}

impl<P, A, T> Default for HandlerRegistry<P, A, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone, A: Clone, T> HandlerSource<P, A, T> for HandlerRegistry<P, A, T> {
    fn pre(&self, name: &str) -> Option<P> {
        self.pre.get(name).cloned()
    }

    fn action(&self, name: &str) -> Option<A> {
        self.actions.get(name).cloned()
    }

    fn post(&self, name: &str) -> Option<PostMiddleware<T>> {
        self.post.get(name).cloned()
    }
}

impl DefaultsConfig {
    /// Parse the configured defaults.
    pub fn resolve(&self) -> Result<Defaults, ResolveError> {
        let method = self
            .method
            .as_deref()
            .map(|m| parse_method(m).map_err(|_| ResolveError::InvalidMethod(m.to_string())))
            .transpose()?;
        Ok(Defaults { method })
    }
}

/// Bind every name in `routes` through `source`.
pub fn resolve_routes<P, A, T, S>(
    routes: &[RouteConfig],
    source: &S,
) -> Result<Vec<RouteNode<P, A, T>>, ResolveError>
where
    S: HandlerSource<P, A, T> + ?Sized,
{
    routes.iter().map(|route| resolve_route(route, source)).collect()
}

fn resolve_route<P, A, T, S>(
    route: &RouteConfig,
    source: &S,
) -> Result<RouteNode<P, A, T>, ResolveError>
where
    S: HandlerSource<P, A, T> + ?Sized,
{
    let mut node = RouteNode::new();

    node.path = match (&route.pattern, &route.path) {
        (Some(pattern), _) => {
            let compiled =
                PathPattern::new(pattern).map_err(|source| ResolveError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            Some(RoutePath::Pattern(compiled))
        }
        (None, Some(path)) if !path.is_empty() => Some(RoutePath::literal(path.as_str())),
        (None, _) => None,
    };

    if let Some(method) = &route.method {
        node.method =
            Some(parse_method(method).map_err(|_| ResolveError::InvalidMethod(method.clone()))?);
    }

    for name in route.pre.as_slice() {
        node.pre.push(lookup(HandlerKind::Pre, name, |n| source.pre(n))?);
    }
    for name in route.post.as_slice() {
        node.post.push(lookup(HandlerKind::Post, name, |n| source.post(n))?);
    }
    if let Some(name) = &route.action {
        node.action = Some(lookup(HandlerKind::Action, name, |n| source.action(n))?);
    }

    node.routes = resolve_routes(&route.routes, source)?;
    Ok(node)
}

fn lookup<H>(
    kind: HandlerKind,
    name: &str,
    find: impl FnOnce(&str) -> Option<H>,
) -> Result<H, ResolveError> {
    find(name).ok_or_else(|| ResolveError::Unknown {
        kind,
        name: name.to_string(),
    })
}
