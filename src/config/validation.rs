//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::load_balancer::endpoint::Endpoint;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("failover.health_check_interval_ms must be greater than zero")]
    ZeroHealthCheckInterval,

    #[error("failover.check_timeout_ms must be greater than zero")]
    ZeroCheckTimeout,

    #[error("endpoints[{index}] is invalid: {reason}")]
    InvalidEndpoint { index: usize, reason: String },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.failover.health_check_interval_ms == 0 {
        errors.push(ValidationError::ZeroHealthCheckInterval);
    }
    if config.failover.check_timeout_ms == 0 {
        errors.push(ValidationError::ZeroCheckTimeout);
    }

    for (index, raw) in config.endpoints.iter().enumerate() {
        if let Err(e) = Endpoint::parse(raw) {
            errors.push(ValidationError::InvalidEndpoint {
                index,
                reason: e.to_string(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
