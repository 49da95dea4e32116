//! Request execution with policy-driven retries.
//!
//! # State Machine
//! ```text
//! Selecting → Requesting → Success
//!                        → EvaluatingFailure
//! EvaluatingFailure → Success            (Ignore)
//!                   → Failed             (ReturnError, attempt ceiling)
//!                   → Requesting         (ReconnectCurrent)
//!                   → Selecting          (ReconnectNext, RemoveAndQuarantine)
//! ```
//!
//! The request function is never retried below this layer, and the pool lock
//! is never held while it runs.

use std::future::Future;
use std::sync::Arc;

use crate::config::schema::{FailoverConfig, FailurePolicy};
use crate::error::{BoxError, FailoverError, Result};
use crate::load_balancer::endpoint::Endpoint;
use crate::load_balancer::pool::PoolManager;
use crate::load_balancer::round_robin::RoundRobin;
use crate::observability::metrics;

/// Drives one logical request through the selector and pool.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    pool: Arc<PoolManager>,
    selector: Arc<RoundRobin>,
}

impl RequestExecutor {
    pub fn new(pool: Arc<PoolManager>, selector: Arc<RoundRobin>) -> Self {
        Self { pool, selector }
    }

    /// Execute `request` under `config`'s failure policy and attempt ceiling.
    pub async fn execute<F, Fut, E>(&self, mut request: F, config: &FailoverConfig) -> Result<()>
    where
        F: FnMut(Endpoint) -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
        E: Into<BoxError>,
    {
        let policy = config.failure_policy;
        let max_attempts = config.effective_max_attempts();

        let mut endpoint = self.select()?;
        let mut attempt: u16 = 1;

        loop {
            let source: BoxError = match request(endpoint.clone()).await {
                Ok(()) => {
                    metrics::record_request("success", attempt);
                    return Ok(());
                }
                Err(e) => e.into(),
            };
            metrics::record_failed_attempt(policy);

            if policy == FailurePolicy::Ignore {
                tracing::debug!(endpoint = %endpoint, error = %source, "Request failed, ignoring");
                metrics::record_request("ignored", attempt);
                return Ok(());
            }

            if attempt >= max_attempts {
                tracing::warn!(
                    endpoint = %endpoint,
                    attempts = attempt,
                    error = %source,
                    "Request failed, attempt ceiling reached"
                );
                metrics::record_request("exhausted", attempt);
                return Err(FailoverError::AttemptsExceeded {
                    attempts: attempt,
                    endpoint,
                    source,
                });
            }

            match policy {
                FailurePolicy::ReturnError => {
                    metrics::record_request("error", attempt);
                    return Err(FailoverError::RequestFailed { endpoint, source });
                }
                FailurePolicy::ReconnectCurrent => {}
                FailurePolicy::ReconnectNext => {
                    endpoint = self.select()?;
                }
                FailurePolicy::RemoveAndQuarantine => {
                    self.pool.quarantine(&endpoint).await;
                    endpoint = self.select()?;
                }
                FailurePolicy::Ignore => unreachable!("handled above"),
            }

            attempt += 1;
            tracing::debug!(
                endpoint = %endpoint,
                attempt,
                policy = policy.as_str(),
                error = %source,
                "Retrying request"
            );
        }
    }

    fn select(&self) -> Result<Endpoint> {
        self.selector.next().ok_or_else(|| {
            metrics::record_request("no_endpoints", 0);
            FailoverError::NoEndpointsAvailable
        })
    }
}
