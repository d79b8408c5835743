//! Nested route tree compiler.
//!
//! Compiles a declarative tree of routes into flat registrations against a
//! routing host. Paths concatenate down the tree, pre and post middleware
//! are inherited root to leaf, and every action is wrapped so it can start
//! an asynchronous, sequential chain of post middleware.
//!
//! ```
//! use std::sync::Arc;
//! use nested_routes::http::RecordingHost;
//! use nested_routes::lifecycle::QueueScheduler;
//! use nested_routes::routing::{Defaults, RouteCompiler, RouteNode};
//! use nested_routes::Method;
//!
//! let routes = vec![RouteNode::<&str, &str, ()>::at("/api")
//!     .pre("auth")
//!     .route(RouteNode::at("users").method(Method::GET).action("list_users"))];
//!
//! let mut host = RecordingHost::new();
//! let report = RouteCompiler::new(&mut host, Arc::new(QueueScheduler::new()))
//!     .with_defaults(Defaults::with_method(Method::POST))
//!     .compile(&routes)
//!     .unwrap();
//!
//! assert_eq!(report.registered, 1);
//! assert_eq!(host.registrations()[0].pre, vec!["auth"]);
//! ```

pub mod config;
pub mod http;
pub mod inspect;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use axum::http::Method;
pub use config::schema::RoutesConfig;
pub use http::{AxumHost, RecordingHost, RouteHost};
pub use lifecycle::{QueueScheduler, Scheduler, TokioScheduler};
pub use routing::{CompileError, RouteCompiler, RouteNode};
