//! Route tree compilation.
//!
//! # Responsibilities
//! - Walk the route tree depth-first, in declaration order
//! - Compose effective paths and feed them to the word index
//! - Derive inherited middleware per node
//! - Resolve each registrable node's method and register it with the host
//!
//! # Design Decisions
//! - Compilation is synchronous and runs once; nothing is retained after it
//! - Children are compiled before their parent's own registration
//! - Methods come from the node or the defaults, never from ancestors
//! - The first host failure aborts compilation; there is no recovery

use std::sync::Arc;

use axum::http::Method;
use serde::Serialize;
use thiserror::Error;

use crate::http::host::{Registration, RouteHost};
use crate::lifecycle::Scheduler;
use crate::routing::method::Defaults;
use crate::routing::middleware::MiddlewareSet;
use crate::routing::node::RouteNode;
use crate::routing::path::RoutePath;
use crate::routing::post_chain::{PostChain, WrappedAction};
use crate::routing::words::PathWordIndex;

/// Errors raised while compiling a route tree.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("a route tree with at least one route is required")]
    NoRoutes,

    #[error("route {path} has an action but no method, and no default method is configured")]
    MissingMethod { path: RoutePath },

    #[error("host rejected {method} {path}: {source}")]
    Host {
        method: Method,
        path: RoutePath,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Outcome of one compilation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompileReport {
    /// Number of registrations accepted by the host.
    pub registered: usize,
    /// Literal words of every composed path, by depth.
    pub words: PathWordIndex,
}

/// Compiles a nested route tree into host registrations.
pub struct RouteCompiler<'h, H> {
    host: &'h mut H,
    scheduler: Arc<dyn Scheduler>,
    defaults: Defaults,
}

impl<'h, H> RouteCompiler<'h, H> {
    pub fn new(host: &'h mut H, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            host,
            scheduler,
            defaults: Defaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Compile `routes` and register every node that carries an action.
    pub fn compile<P, A, T>(
        self,
        routes: &[RouteNode<P, A, T>],
    ) -> Result<CompileReport, CompileError>
    where
        H: RouteHost<P, A, T>,
        P: Clone,
        A: Clone,
    {
        if routes.is_empty() {
            return Err(CompileError::NoRoutes);
        }

        let mut walk = Walk {
            host: self.host,
            scheduler: self.scheduler,
            defaults: self.defaults,
            report: CompileReport::default(),
        };
        walk.load(&RoutePath::root(), routes, &MiddlewareSet::new())?;

        tracing::info!(
            registered = walk.report.registered,
            words = walk.report.words.len(),
            "Route tree compiled"
        );
        Ok(walk.report)
    }
}

struct Walk<'h, H> {
    host: &'h mut H,
    scheduler: Arc<dyn Scheduler>,
    defaults: Defaults,
    report: CompileReport,
}

impl<H> Walk<'_, H> {
    fn load<P, A, T>(
        &mut self,
        parent: &RoutePath,
        routes: &[RouteNode<P, A, T>],
        inherited: &MiddlewareSet<P, T>,
    ) -> Result<(), CompileError>
    where
        H: RouteHost<P, A, T>,
        P: Clone,
        A: Clone,
    {
        for node in routes {
            let path = parent.compose(node.path.as_ref());
            self.report.words.index(&path);

            let middleware = inherited.derive(&node.pre, &node.post);

            if !node.routes.is_empty() {
                self.load(&path, &node.routes, &middleware)?;
            }

            if let Some(action) = &node.action {
                self.register(path, action.clone(), node.method.as_ref(), middleware)?;
            }
        }
        Ok(())
    }

    fn register<P, A, T>(
        &mut self,
        path: RoutePath,
        action: A,
        own_method: Option<&Method>,
        middleware: MiddlewareSet<P, T>,
    ) -> Result<(), CompileError>
    where
        H: RouteHost<P, A, T>,
    {
        let Some(method) = self.defaults.resolve(own_method) else {
            return Err(CompileError::MissingMethod { path });
        };

        tracing::debug!(
            method = %method,
            path = %path,
            pre = middleware.pre.len(),
            post = middleware.post.len(),
            "Registering route"
        );

        let chain = PostChain::new(middleware.post, Arc::clone(&self.scheduler));
        let registration = Registration {
            method: method.clone(),
            path: path.clone(),
            pre: middleware.pre,
            action: WrappedAction::new(action, chain),
        };

        self.host
            .register(registration)
            .map_err(|source| CompileError::Host {
                method,
                path,
                source: Box::new(source),
            })?;
        self.report.registered += 1;
        Ok(())
    }
}
