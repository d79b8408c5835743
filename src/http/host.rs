//! Routing host capability.
//!
//! # Responsibilities
//! - Accept one compiled registration per registrable route node
//! - Reject what the host cannot serve (unknown methods, unsupported paths)
//!
//! # Design Decisions
//! - The host is injected; the compiler never inspects it beyond `register`
//! - Method validation belongs to the host, not the compiler

use axum::http::Method;
use thiserror::Error;

use crate::routing::path::RoutePath;
use crate::routing::post_chain::WrappedAction;

/// A compiled route, handed to the host and not retained by the compiler.
#[derive(Debug)]
pub struct Registration<P, A, T> {
    pub method: Method,
    pub path: RoutePath,
    /// Inherited pre middleware, root first, then the node's own.
    pub pre: Vec<P>,
    pub action: WrappedAction<A, T>,
}

/// Registrar exposing one operation per HTTP method.
pub trait RouteHost<P, A, T> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn register(&mut self, registration: Registration<P, A, T>) -> Result<(), Self::Error>;
}

/// Errors raised by the bundled hosts.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("method {method} is not supported by this host (path {path})")]
    UnsupportedMethod { method: Method, path: RoutePath },

    #[error("pattern path {0} cannot be mounted on this host")]
    UnsupportedPattern(RoutePath),

    #[error("{method} {path} is already registered")]
    Duplicate { method: Method, path: RoutePath },

    #[error("path {path:?} is not a valid route path: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("{method} {path} cannot be mounted: {reason}")]
    Conflict {
        method: Method,
        path: RoutePath,
        reason: String,
    },
}
