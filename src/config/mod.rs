//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → FailoverConfig handed to the dispatcher
//!
//! Per request:
//!     RequestOptions applied to a copy of FailoverConfig
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Per-call overrides never mutate the shared configuration

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::AppConfig;
pub use schema::FailoverConfig;
pub use schema::FailurePolicy;
pub use schema::RequestOptions;
