//! Lifecycle management subsystem.
//!
//! Background workers (the health monitor) subscribe to a [`Shutdown`]
//! coordinator owned by their handle, so they never outlive it unnoticed.

pub mod shutdown;

pub use shutdown::Shutdown;
