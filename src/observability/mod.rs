//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pool, executor and health monitor produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges via the metrics facade)
//!
//! Consumers:
//!     → stdout (fmt layer, RUST_LOG filtering)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The library only emits; installing subscribers/recorders is the
//!   binary's job
//! - Metrics without an installed recorder are no-ops

pub mod logging;
pub mod metrics;
