//! Declarative route tree nodes.

use axum::http::Method;

use crate::routing::path::RoutePath;
use crate::routing::post_chain::{Continuation, PostMiddleware};

/// One entry of a nested route tree.
///
/// `P` is the host's pre-middleware type, `A` the action type and `T` the
/// payload the action hands to its post chain. A node with an action is
/// registrable; a node with neither action nor children only contributes
/// its path to the word index.
#[derive(Debug)]
pub struct RouteNode<P, A, T> {
    /// Path fragment. Absent means the parent's effective path is reused.
    pub path: Option<RoutePath>,
    pub action: Option<A>,
    pub pre: Vec<P>,
    pub post: Vec<PostMiddleware<T>>,
    /// Own method. Never inherited from ancestors.
    pub method: Option<Method>,
    pub routes: Vec<RouteNode<P, A, T>>,
}

impl<P, A, T> RouteNode<P, A, T> {
    pub fn new() -> Self {
        Self {
            path: None,
            action: None,
            pre: Vec::new(),
            post: Vec::new(),
            method: None,
            routes: Vec::new(),
        }
    }

    /// Node with a path fragment.
    pub fn at(path: impl Into<RoutePath>) -> Self {
        Self::new().path(path)
    }

    pub fn path(mut self, path: impl Into<RoutePath>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Append one pre middleware.
    pub fn pre(mut self, middleware: P) -> Self {
        self.pre.push(middleware);
        self
    }

    /// Append pre middleware in order.
    pub fn pre_all(mut self, middleware: impl IntoIterator<Item = P>) -> Self {
        self.pre.extend(middleware);
        self
    }

    /// Append one post middleware.
    pub fn post(mut self, middleware: PostMiddleware<T>) -> Self {
        self.post.push(middleware);
        self
    }

    /// Append a plain closure as post middleware.
    pub fn post_fn<F>(self, f: F) -> Self
    where
        F: Fn(T, Continuation<T>) + Send + Sync + 'static,
    {
        self.post(PostMiddleware::new(f))
    }

    /// Append post middleware in order.
    pub fn post_all(mut self, middleware: impl IntoIterator<Item = PostMiddleware<T>>) -> Self {
        self.post.extend(middleware);
        self
    }

    /// Append one child route.
    pub fn route(mut self, child: RouteNode<P, A, T>) -> Self {
        self.routes.push(child);
        self
    }

    /// Append child routes in order.
    pub fn routes(mut self, children: impl IntoIterator<Item = RouteNode<P, A, T>>) -> Self {
        self.routes.extend(children);
        self
    }

    pub fn is_registrable(&self) -> bool {
        self.action.is_some()
    }

    pub fn is_inert(&self) -> bool {
        self.action.is_none() && self.routes.is_empty()
    }
}

impl<P, A, T> Default for RouteNode<P, A, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Node = RouteNode<&'static str, &'static str, ()>;

    #[test]
    fn test_builder_keeps_declared_order() {
        let node: Node = RouteNode::at("/api")
            .pre("auth")
            .pre_all(["log", "trace"])
            .post_fn(|_, _| {})
            .route(RouteNode::at("users").action("list"))
            .route(RouteNode::new());

        assert_eq!(node.path, Some(RoutePath::literal("/api")));
        assert_eq!(node.pre, vec!["auth", "log", "trace"]);
        assert_eq!(node.post.len(), 1);
        assert_eq!(node.routes.len(), 2);
        assert!(!node.is_registrable());
        assert!(!node.is_inert());
        assert!(node.routes[1].is_inert());
    }

    #[test]
    fn test_method_is_optional() {
        let node: Node = RouteNode::new().action("index");
        assert!(node.method.is_none());

        let node = node.method(Method::DELETE);
        assert_eq!(node.method, Some(Method::DELETE));
        assert!(node.is_registrable());
    }
}
