//! axum routing host.
//!
//! # Responsibilities
//! - Mount compiled registrations onto an `axum::Router`
//! - Translate `:name` / `*name` segments into axum captures
//! - Layer pre middleware so the first declared runs first
//! - Invoke the wrapped action as the route handler
//!
//! # Design Decisions
//! - Pattern paths are rejected: axum has no regex routes
//! - Duplicate method/path pairs and overlapping captures are reported instead
//!   of letting axum panic; a `matchit` shadow of the mounted paths catches the
//!   same conflicts axum's own tree would
//! - Pre middleware see the request before the action and may short-circuit

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::Method;
use axum::middleware::{from_fn, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{on, MethodFilter, MethodRouter};
use axum::Router;
use futures_util::future::BoxFuture;

use crate::http::host::{HostError, Registration, RouteHost};
use crate::routing::path::{RoutePath, SEPARATOR};
use crate::routing::post_chain::Continuation;

/// Pre middleware run before the action, in the style of `axum::middleware::from_fn`.
pub type PreHandler = Arc<dyn Fn(Request, Next) -> BoxFuture<'static, Response> + Send + Sync>;

/// Route action, handed the request and the entry point of its post chain.
pub type ActionHandler<T> =
    Arc<dyn Fn(Request, Continuation<T>) -> BoxFuture<'static, Response> + Send + Sync>;

/// Box an async function as pre middleware.
pub fn pre_fn<F, Fut>(f: F) -> PreHandler
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |req, next| Box::pin(f(req, next)))
}

/// Box an async function as a route action.
pub fn action_fn<T, F, Fut, R>(f: F) -> ActionHandler<T>
where
    F: Fn(Request, Continuation<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Arc::new(move |req, post| {
        let fut = f(req, post);
        Box::pin(async move { fut.await.into_response() })
    })
}

/// Host that mounts routes onto an axum router.
#[derive(Debug, Default)]
pub struct AxumHost {
    router: Router,
    mounted: HashSet<(Method, String)>,
    paths: matchit::Router<()>,
    path_set: HashSet<String>,
}

impl AxumHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount onto an existing router.
    pub fn from_router(router: Router) -> Self {
        Self {
            router,
            ..Self::default()
        }
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

impl<T: Send + 'static> RouteHost<PreHandler, ActionHandler<T>, T> for AxumHost {
    type Error = HostError;

    fn register(
        &mut self,
        registration: Registration<PreHandler, ActionHandler<T>, T>,
    ) -> Result<(), HostError> {
        let Registration {
            method,
            path,
            pre,
            action,
        } = registration;

        let literal = match &path {
            RoutePath::Literal(literal) => axum_path(literal)?,
            RoutePath::Pattern(_) => return Err(HostError::UnsupportedPattern(path)),
        };
        let Ok(filter) = MethodFilter::try_from(method.clone()) else {
            return Err(HostError::UnsupportedMethod { method, path });
        };
        if self.mounted.contains(&(method.clone(), literal.clone())) {
            return Err(HostError::Duplicate { method, path });
        }
        // Methods on an already mounted path merge into its method router.
        if !self.path_set.contains(&literal) {
            if let Err(err) = self.paths.insert(literal.as_str(), ()) {
                return Err(HostError::Conflict {
                    method,
                    path,
                    reason: err.to_string(),
                });
            }
            self.path_set.insert(literal.clone());
        }
        self.mounted.insert((method.clone(), literal.clone()));

        let handler = move |req: Request| {
            let action = action.clone();
            async move {
                let (entry, guard) = action.post_chain().held_entry();
                let response = (action.action())(req, entry).await;
                guard.release();
                response
            }
        };

        let mut method_router: MethodRouter = on(filter, handler);
        // Outermost layer runs first.
        for middleware in pre.into_iter().rev() {
            method_router = method_router.layer(from_fn(move |req: Request, next: Next| {
                let middleware = Arc::clone(&middleware);
                async move { middleware(req, next).await }
            }));
        }

        tracing::debug!(method = %method, path = %literal, "Mounted axum route");
        self.router = std::mem::take(&mut self.router).route(&literal, method_router);
        Ok(())
    }
}

/// Rewrite a composed path into axum's route syntax.
pub fn axum_path(path: &str) -> Result<String, HostError> {
    if path.is_empty() {
        return Ok(SEPARATOR.to_string());
    }
    if !path.starts_with(SEPARATOR) {
        return Err(HostError::InvalidPath {
            path: path.to_string(),
            reason: "route paths must start with '/'",
        });
    }

    let translated: Vec<String> = path
        .split(SEPARATOR)
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{name}}}")
            } else if let Some(name) = segment.strip_prefix('*') {
                format!("{{*{name}}}")
            } else {
                segment.to_string()
            }
        })
        .collect();
    Ok(translated.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axum_path_translation() {
        assert_eq!(axum_path("").unwrap(), "/");
        assert_eq!(axum_path("/users/:id").unwrap(), "/users/{id}");
        assert_eq!(axum_path("/files/*rest").unwrap(), "/files/{*rest}");
        assert_eq!(axum_path("/users/{id}").unwrap(), "/users/{id}");
        assert!(matches!(
            axum_path("users"),
            Err(HostError::InvalidPath { .. })
        ));
    }
}
