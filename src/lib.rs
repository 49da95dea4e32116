//! Client-side failover dispatcher.
//!
//! Holds a pool of endpoints, picks one per request in round-robin order,
//! reacts to failures according to a [`FailurePolicy`], and re-validates
//! endpoints in the background so the pool heals itself.

pub mod config;
pub mod error;
pub mod failover;
pub mod health;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod resilience;

pub use config::{FailoverConfig, FailurePolicy, RequestOptions};
pub use error::{BoxError, FailoverError, Result};
pub use failover::Failover;
pub use health::{ConnectivityCheck, HealthCheckHandle, HttpProbe};
pub use load_balancer::Endpoint;
