//! Metrics collection and exposition.
//!
//! # Metrics
//! - `failover_requests_total` (counter): completed `execute` calls by outcome
//! - `failover_request_attempts` (histogram): attempts used per call
//! - `failover_failed_attempts_total` (counter): failed attempts by policy
//! - `failover_quarantined_total` / `failover_restored_total` (counters)
//! - `failover_active_endpoints` / `failover_quarantined_endpoints` (gauges)

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::schema::FailurePolicy;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(outcome: &'static str, attempts: u16) {
    metrics::counter!("failover_requests_total", "outcome" => outcome).increment(1);
    if attempts > 0 {
        metrics::histogram!("failover_request_attempts").record(f64::from(attempts));
    }
}

pub fn record_failed_attempt(policy: FailurePolicy) {
    metrics::counter!("failover_failed_attempts_total", "policy" => policy.as_str()).increment(1);
}

pub fn record_quarantine() {
    metrics::counter!("failover_quarantined_total").increment(1);
}

pub fn record_restore() {
    metrics::counter!("failover_restored_total").increment(1);
}

pub fn record_pool_sizes(active: usize, quarantined: usize) {
    metrics::gauge!("failover_active_endpoints").set(active as f64);
    metrics::gauge!("failover_quarantined_endpoints").set(quarantined as f64);
}
