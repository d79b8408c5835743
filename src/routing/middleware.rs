//! Middleware inheritance down the route tree.
//!
//! Each tree-walk frame owns its own `MiddlewareSet`: the parent's lists
//! copied, then the node's own entries appended. Siblings never see each
//! other's additions and ancestors are never touched.

use crate::routing::post_chain::PostMiddleware;

/// Pre and post middleware inherited by one branch of the tree.
#[derive(Debug)]
pub struct MiddlewareSet<P, T> {
    pub pre: Vec<P>,
    pub post: Vec<PostMiddleware<T>>,
}

impl<P, T> MiddlewareSet<P, T> {
    /// The empty set the tree walk starts from.
    pub fn new() -> Self {
        Self {
            pre: Vec::new(),
            post: Vec::new(),
        }
    }

    /// Child set: copies of both lists with `pre` and `post` appended in order.
    pub fn derive(&self, pre: &[P], post: &[PostMiddleware<T>]) -> Self
    where
        P: Clone,
    {
        let mut child_pre = Vec::with_capacity(self.pre.len() + pre.len());
        child_pre.extend_from_slice(&self.pre);
        child_pre.extend_from_slice(pre);

        let mut child_post = Vec::with_capacity(self.post.len() + post.len());
        child_post.extend_from_slice(&self.post);
        child_post.extend_from_slice(post);

        Self {
            pre: child_pre,
            post: child_post,
        }
    }
}

impl<P, T> Default for MiddlewareSet<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone, T> Clone for MiddlewareSet<P, T> {
    fn clone(&self) -> Self {
        Self {
            pre: self.pre.clone(),
            post: self.post.clone(),
        }
    }
}
