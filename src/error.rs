//! Error types shared across the dispatcher.

use std::time::Duration;
use thiserror::Error;

use crate::load_balancer::endpoint::Endpoint;

/// Opaque error returned by caller-supplied collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by pool mutation and request execution.
#[derive(Debug, Error)]
pub enum FailoverError {
    /// Endpoint was empty, unparsable or has no host.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The connectivity check rejected an endpoint.
    #[error("Connectivity check failed for {endpoint}: {source}")]
    ConnectivityCheckFailed {
        endpoint: Endpoint,
        #[source]
        source: BoxError,
    },

    /// The active set was empty at selection time.
    #[error("No endpoints available")]
    NoEndpointsAvailable,

    /// The request function failed and the policy said to give up.
    #[error("Request to {endpoint} failed: {source}")]
    RequestFailed {
        endpoint: Endpoint,
        #[source]
        source: BoxError,
    },

    /// The attempt ceiling was reached.
    #[error("Request failed after {attempts} attempts (last endpoint {endpoint}): {source}")]
    AttemptsExceeded {
        attempts: u16,
        endpoint: Endpoint,
        #[source]
        source: BoxError,
    },
}

/// Result type for dispatcher operations.
pub type Result<T> = std::result::Result<T, FailoverError>;

/// A connectivity check did not finish within its deadline.
#[derive(Debug, Error)]
#[error("Check timed out after {0:?}")]
pub struct CheckTimedOut(pub Duration);

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = FailoverError::NoEndpointsAvailable;
        assert_eq!(err.to_string(), "No endpoints available");

        let err = FailoverError::AttemptsExceeded {
            attempts: 3,
            endpoint: Endpoint::must_parse("http://10.0.0.1:8080"),
            source: "connection refused".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("3 attempts"));
        assert!(msg.contains("10.0.0.1:8080"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_source_is_preserved() {
        let err = FailoverError::RequestFailed {
            endpoint: Endpoint::must_parse("http://10.0.0.1"),
            source: "boom".into(),
        };
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".to_string()));
    }

    #[test]
    fn test_timeout_display() {
        let err = CheckTimedOut(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Check timed out after 250ms");
    }
}
