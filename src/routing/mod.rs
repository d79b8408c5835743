//! Route tree compilation subsystem.
//!
//! # Data Flow
//! ```text
//! RouteNode tree (declared once at startup)
//!     → compiler.rs (depth-first walk, declaration order)
//!         → path.rs (compose parent + child path)
//!         → words.rs (index literal words by depth)
//!         → middleware.rs (derive inherited pre/post lists)
//!         → method.rs (own method or configured default)
//!         → post_chain.rs (wrap action with its post chain)
//!     → RouteHost::register (one call per registrable node)
//! ```
//!
//! # Design Decisions
//! - Compiled once, synchronously; the tree is never mutated
//! - Path and middleware inherit down the tree; method does not
//! - Post middleware run later, per request, through a scheduler

pub mod compiler;
pub mod method;
pub mod middleware;
pub mod node;
pub mod path;
pub mod post_chain;
pub mod words;

pub use compiler::{CompileError, CompileReport, RouteCompiler};
pub use method::{parse_method, Defaults};
pub use middleware::MiddlewareSet;
pub use node::RouteNode;
pub use path::{PathPattern, RoutePath};
pub use post_chain::{
    Action, Continuation, EntryGuard, PostChain, PostMiddleware, WrappedAction,
};
pub use words::PathWordIndex;
