//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Execute:
//!     → executor.rs (select, request, apply failure policy, bounded loop)
//!
//! Connectivity checks:
//!     → timeouts.rs (deadline around every collaborator call)
//! ```

pub mod executor;
pub mod timeouts;

pub use executor::RequestExecutor;
