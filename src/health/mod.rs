//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Pre-add check (check.rs):
//!     AddEndpoint → ConnectivityCheck → accept or reject
//!
//! Active health checks (active.rs):
//!     Periodic timer
//!     → Probe active set    → failures quarantined
//!     → Probe quarantine set → successes restored
//! ```
//!
//! # Design Decisions
//! - The same collaborator serves pre-add checks and scans
//! - Every check runs under a deadline
//! - The loop has an explicit owner handle and shutdown path

pub mod active;
pub mod check;

pub use active::{HealthCheckHandle, HealthMonitor, ScanReport};
pub use check::{ConnectivityCheck, HttpProbe};
