//! Configuration schema definitions.
//!
//! This module defines the dispatcher configuration and the file layout read
//! by the CLI. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Attempt ceiling used when `max_attempts` is left at zero.
pub const DEFAULT_MAX_ATTEMPTS: u16 = 3;

pub const DEFAULT_HEALTH_CHECK_INTERVAL_MS: u64 = 30_000;

/// What the executor does after the request function fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Quarantine the failed endpoint and retry on the next one.
    #[default]
    RemoveAndQuarantine,
    /// Treat the failure as success.
    Ignore,
    /// Surface the error without retrying.
    ReturnError,
    /// Retry on the next endpoint, leaving the failed one active.
    ReconnectNext,
    /// Retry on the same endpoint.
    ReconnectCurrent,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::RemoveAndQuarantine => "remove_and_quarantine",
            FailurePolicy::Ignore => "ignore",
            FailurePolicy::ReturnError => "return_error",
            FailurePolicy::ReconnectNext => "reconnect_next",
            FailurePolicy::ReconnectCurrent => "reconnect_current",
        }
    }
}

/// Per-dispatcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FailoverConfig {
    /// Run the connectivity check before an endpoint enters the active set.
    pub check_before_adding: bool,

    /// Health-check interval in milliseconds.
    pub health_check_interval_ms: u64,

    /// Deadline for a single connectivity check in milliseconds.
    pub check_timeout_ms: u64,

    /// Reaction to a failed request.
    pub failure_policy: FailurePolicy,

    /// Maximum request attempts per call (0 = default).
    pub max_attempts: u16,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            check_before_adding: true,
            health_check_interval_ms: DEFAULT_HEALTH_CHECK_INTERVAL_MS,
            check_timeout_ms: 5_000,
            failure_policy: FailurePolicy::RemoveAndQuarantine,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl FailoverConfig {
    pub fn with_check_before_adding(mut self, enabled: bool) -> Self {
        self.check_before_adding = enabled;
        self
    }

    pub fn with_health_check_interval(mut self, interval: Duration) -> Self {
        self.health_check_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_check_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u16) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn health_check_interval(&self) -> Duration {
        Duration::from_millis(self.health_check_interval_ms)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_millis(self.check_timeout_ms)
    }

    /// Attempt ceiling with the zero-means-default rule applied.
    pub fn effective_max_attempts(&self) -> u16 {
        if self.max_attempts == 0 {
            DEFAULT_MAX_ATTEMPTS
        } else {
            self.max_attempts
        }
    }
}

/// Overrides for a single `execute` call.
///
/// Applied to a copy of the dispatcher's configuration; the shared
/// configuration is never modified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub failure_policy: Option<FailurePolicy>,
    pub max_attempts: Option<u16>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    pub fn max_attempts(mut self, attempts: u16) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Produce the configuration this call runs with.
    pub fn apply(&self, base: &FailoverConfig) -> FailoverConfig {
        let mut local = base.clone();
        if let Some(policy) = self.failure_policy {
            local.failure_policy = policy;
        }
        if let Some(attempts) = self.max_attempts {
            local.max_attempts = attempts;
        }
        local
    }
}

/// Root configuration file for the CLI.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Dispatcher settings.
    pub failover: FailoverConfig,

    /// Endpoint addresses (e.g., "http://127.0.0.1:3000").
    pub endpoints: Vec<String>,

    /// HTTP probe settings.
    pub probe: ProbeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Path to probe for HTTP connectivity checks.
    pub path: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            path: "/health".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FailoverConfig::default();
        assert!(config.check_before_adding);
        assert_eq!(config.health_check_interval(), Duration::from_secs(30));
        assert_eq!(config.failure_policy, FailurePolicy::RemoveAndQuarantine);
        assert_eq!(config.effective_max_attempts(), 3);
    }

    #[test]
    fn test_zero_attempts_means_default() {
        let config = FailoverConfig::default().with_max_attempts(0);
        assert_eq!(config.effective_max_attempts(), DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn test_request_options_leave_base_untouched() {
        let base = FailoverConfig::default();
        let local = RequestOptions::new()
            .failure_policy(FailurePolicy::Ignore)
            .max_attempts(7)
            .apply(&base);

        assert_eq!(local.failure_policy, FailurePolicy::Ignore);
        assert_eq!(local.max_attempts, 7);
        assert_eq!(base, FailoverConfig::default());
    }

    #[test]
    fn test_policy_from_toml() {
        let config: FailoverConfig = toml::from_str(
            r#"
            failure_policy = "reconnect_next"
            max_attempts = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::ReconnectNext);
        assert_eq!(config.max_attempts, 5);
        assert!(config.check_before_adding);
    }
}
