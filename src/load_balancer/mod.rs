//! Endpoint pool and selection.
//!
//! # Data Flow
//! ```text
//! AddEndpoint
//!     → pool.rs (validate, optional pre-check, insert under lock)
//!     → set.rs (copy-on-write swap of the active set)
//!
//! Execute
//!     → round_robin.rs (lock-free read of the active snapshot)
//!     → endpoint.rs (selected destination handed to the request function)
//! ```
//!
//! # Design Decisions
//! - Sets are immutable snapshots swapped whole; readers never block
//! - All membership changes go through one lock in the pool manager
//! - Selection never takes that lock

pub mod endpoint;
pub mod pool;
pub mod round_robin;
pub mod set;

pub use endpoint::Endpoint;
pub use pool::PoolManager;
pub use round_robin::RoundRobin;
pub use set::EndpointSet;
