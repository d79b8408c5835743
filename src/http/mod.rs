//! Routing hosts.
//!
//! # Data Flow
//! ```text
//! RouteCompiler
//!     → Registration { method, path, pre, wrapped action }
//!     → host.rs (RouteHost::register)
//!         → recorder.rs (in-memory, for inspection and tests)
//!         → axum_host.rs (mount onto axum::Router)
//! ```

pub mod axum_host;
pub mod host;
pub mod recorder;

pub use axum_host::{action_fn, pre_fn, ActionHandler, AxumHost, PreHandler};
pub use host::{HostError, Registration, RouteHost};
pub use recorder::RecordingHost;
