//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing/compiler.rs   → debug per registration, info summary
//! routing/post_chain.rs → trace per deferred post middleware
//! http/axum_host.rs     → debug per mounted route
//!     → logging.rs (tracing subscriber, stderr)
//! ```

pub mod logging;

pub use logging::init_logging;
