//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! routes file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RoutesConfig (validated, immutable)
//!     → resolve.rs (handler names → handlers)
//!     → RouteNode tree, ready for RouteCompiler
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Handlers live in code; config only names them

pub mod loader;
pub mod resolve;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use resolve::{resolve_routes, HandlerKind, HandlerRegistry, HandlerSource, ResolveError};
pub use schema::{DefaultsConfig, LogFormat, LoggingConfig, OneOrMany, RouteConfig, RoutesConfig};
pub use validation::{validate_config, ValidationError};
