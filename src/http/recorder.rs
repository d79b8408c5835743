//! In-memory routing host.
//!
//! Stores every registration in arrival order. Useful for inspecting a
//! compiled tree and for driving actions directly in tests.

use axum::http::Method;

use crate::http::host::{HostError, Registration, RouteHost};

/// Host that records registrations instead of serving them.
#[derive(Debug)]
pub struct RecordingHost<P, A, T> {
    registrations: Vec<Registration<P, A, T>>,
    allowed: Option<Vec<Method>>,
}

impl<P, A, T> RecordingHost<P, A, T> {
    /// A host accepting any method.
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            allowed: None,
        }
    }

    /// A host accepting only the listed methods.
    pub fn with_methods(methods: impl IntoIterator<Item = Method>) -> Self {
        Self {
            registrations: Vec::new(),
            allowed: Some(methods.into_iter().collect()),
        }
    }

    /// A host accepting the nine standard methods only.
    pub fn standard() -> Self {
        Self::with_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
            Method::CONNECT,
            Method::PATCH,
            Method::TRACE,
        ])
    }

    pub fn registrations(&self) -> &[Registration<P, A, T>] {
        &self.registrations
    }

    pub fn into_registrations(self) -> Vec<Registration<P, A, T>> {
        self.registrations
    }

    /// First registration for `method` on a literal `path`.
    pub fn find(&self, method: &Method, path: &str) -> Option<&Registration<P, A, T>> {
        self.registrations
            .iter()
            .find(|r| &r.method == method && r.path.as_literal() == Some(path))
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn supports(&self, method: &Method) -> bool {
        self.allowed
            .as_ref()
            .map_or(true, |allowed| allowed.contains(method))
    }
}

impl<P, A, T> Default for RecordingHost<P, A, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, A, T> RouteHost<P, A, T> for RecordingHost<P, A, T> {
    type Error = HostError;

    fn register(&mut self, registration: Registration<P, A, T>) -> Result<(), HostError> {
        if !self.supports(&registration.method) {
            return Err(HostError::UnsupportedMethod {
                method: registration.method,
                path: registration.path,
            });
        }
        self.registrations.push(registration);
        Ok(())
    }
}
