//! Request lifecycle support.
//!
//! # Data Flow
//! ```text
//! action calls the post-chain entry point
//!     → the call is held until the action returns
//!     → scheduler.rs defers the first post middleware
//!     → each post middleware calls its continuation to defer the next
//! ```

pub mod scheduler;

pub use scheduler::{Job, QueueScheduler, Scheduler, SchedulerError, TokioScheduler};
