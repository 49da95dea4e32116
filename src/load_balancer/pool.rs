//! Endpoint pool management.
//!
//! # Responsibilities
//! - Own the active and quarantined endpoint sets
//! - Linearize every membership change through one mutation lock
//! - Gate additions behind an optional connectivity pre-check
//!
//! Snapshot reads never take the lock. Moves between sets remove first and
//! insert second, so an endpoint may be briefly absent from both but is never
//! observed in both.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::error::{BoxError, FailoverError, Result};
use crate::health::check::ConnectivityCheck;
use crate::load_balancer::endpoint::Endpoint;
use crate::load_balancer::set::EndpointSet;
use crate::observability::metrics;
use crate::resilience::timeouts::check_with_timeout;

/// Single source of truth for active/quarantine membership.
pub struct PoolManager {
    active: Arc<EndpointSet>,
    quarantined: Arc<EndpointSet>,
    mutation: Mutex<()>,
    check: Arc<dyn ConnectivityCheck>,
    check_timeout: Duration,
    check_before_adding: bool,
}

impl PoolManager {
    pub fn new(
        check: Arc<dyn ConnectivityCheck>,
        check_timeout: Duration,
        check_before_adding: bool,
    ) -> Self {
        Self {
            active: Arc::new(EndpointSet::new()),
            quarantined: Arc::new(EndpointSet::new()),
            mutation: Mutex::new(()),
            check,
            check_timeout,
            check_before_adding,
        }
    }

    /// Live handle on the active set, for the selector.
    pub fn active_set(&self) -> Arc<EndpointSet> {
        self.active.clone()
    }

    pub fn active(&self) -> Arc<Vec<Endpoint>> {
        self.active.load()
    }

    pub fn quarantined(&self) -> Arc<Vec<Endpoint>> {
        self.quarantined.load()
    }

    /// Run the connectivity check under its deadline without touching the pool.
    pub async fn probe(&self, endpoint: &Endpoint) -> std::result::Result<(), BoxError> {
        check_with_timeout(self.check.as_ref(), endpoint, self.check_timeout).await
    }

    /// Add an endpoint to the active set.
    ///
    /// The lock is held across the pre-check, so a slow check delays other
    /// mutations by at most the check timeout. Re-adding an endpoint moves it
    /// to the end of rotation order.
    pub async fn add_endpoint(&self, endpoint: Endpoint) -> Result<()> {
        endpoint.validate()?;

        let _guard = self.mutation.lock().await;

        if self.check_before_adding {
            if let Err(source) = self.probe(&endpoint).await {
                tracing::warn!(endpoint = %endpoint, error = %source, "Rejected endpoint: connectivity check failed");
                return Err(FailoverError::ConnectivityCheckFailed { endpoint, source });
            }
        }

        self.quarantined.remove(&endpoint);
        self.active.insert(&endpoint);
        tracing::debug!(endpoint = %endpoint, active = self.active.len(), "Endpoint added");
        self.record_sizes();
        Ok(())
    }

    /// Add endpoints in order, stopping at the first error. Endpoints added
    /// before the failure stay added.
    pub async fn add_endpoints<I>(&self, endpoints: I) -> Result<()>
    where
        I: IntoIterator<Item = Endpoint>,
    {
        for endpoint in endpoints {
            self.add_endpoint(endpoint).await?;
        }
        Ok(())
    }

    /// Remove an endpoint from both sets. Returns whether it was a member.
    pub async fn remove_endpoint(&self, endpoint: &Endpoint) -> bool {
        let _guard = self.mutation.lock().await;

        let was_active = self.active.remove(endpoint);
        let was_quarantined = self.quarantined.remove(endpoint);
        if was_active || was_quarantined {
            tracing::debug!(endpoint = %endpoint, "Endpoint removed");
            self.record_sizes();
        }
        was_active || was_quarantined
    }

    /// Move an endpoint from active to quarantine.
    ///
    /// Endpoints that are in neither set were removed explicitly and are left
    /// alone. Returns whether the endpoint is now quarantined.
    pub async fn quarantine(&self, endpoint: &Endpoint) -> bool {
        let _guard = self.mutation.lock().await;

        let was_active = self.active.remove(endpoint);
        if !was_active && !self.quarantined.contains(endpoint) {
            return false;
        }

        self.quarantined.insert(endpoint);
        if was_active {
            tracing::warn!(endpoint = %endpoint, active = self.active.len(), "Endpoint quarantined");
            metrics::record_quarantine();
            self.record_sizes();
        }
        true
    }

    /// Move an endpoint from quarantine back to active. Returns whether it
    /// was quarantined.
    pub async fn restore(&self, endpoint: &Endpoint) -> bool {
        let _guard = self.mutation.lock().await;

        if !self.quarantined.remove(endpoint) {
            return false;
        }

        self.active.insert(endpoint);
        tracing::info!(endpoint = %endpoint, active = self.active.len(), "Endpoint restored");
        metrics::record_restore();
        self.record_sizes();
        true
    }

    fn record_sizes(&self) {
        metrics::record_pool_sizes(self.active.len(), self.quarantined.len());
    }
}

impl std::fmt::Debug for PoolManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolManager")
            .field("active", &self.active)
            .field("quarantined", &self.quarantined)
            .field("check_timeout", &self.check_timeout)
            .field("check_before_adding", &self.check_before_adding)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ep(raw: &str) -> Endpoint {
        Endpoint::must_parse(raw)
    }

    fn always_ok() -> Arc<dyn ConnectivityCheck> {
        Arc::new(|_: Endpoint| async { Ok::<(), BoxError>(()) })
    }

    fn reject_host(bad: &'static str) -> Arc<dyn ConnectivityCheck> {
        Arc::new(move |e: Endpoint| async move {
            if e.host() == Some(bad) {
                Err::<(), BoxError>("refused".into())
            } else {
                Ok(())
            }
        })
    }

    fn pool(check: Arc<dyn ConnectivityCheck>, pre_check: bool) -> PoolManager {
        PoolManager::new(check, Duration::from_secs(1), pre_check)
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let pool = pool(always_ok(), true);
        pool.add_endpoint(ep("http://a")).await.unwrap();
        pool.add_endpoint(ep("http://b")).await.unwrap();
        pool.add_endpoint(ep("http://a")).await.unwrap();

        let active = pool.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[1], ep("http://a"));
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_endpoint() {
        let pool = pool(always_ok(), true);
        let hostless = Endpoint::from(url::Url::parse("mailto:ops@example.com").unwrap());

        let err = pool.add_endpoint(hostless).await.unwrap_err();
        assert!(matches!(err, FailoverError::InvalidEndpoint(_)));
        assert!(pool.active().is_empty());
        assert!(pool.quarantined().is_empty());
    }

    #[tokio::test]
    async fn test_pre_check_failure_blocks_add() {
        let pool = pool(reject_host("bad"), true);
        let err = pool.add_endpoint(ep("http://bad")).await.unwrap_err();
        assert!(matches!(err, FailoverError::ConnectivityCheckFailed { .. }));
        assert!(pool.active().is_empty());
    }

    #[tokio::test]
    async fn test_pre_check_can_be_disabled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let check: Arc<dyn ConnectivityCheck> = Arc::new(move |_: Endpoint| {
            seen.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), BoxError>("down".into()) }
        });

        let pool = pool(check, false);
        pool.add_endpoint(ep("http://a")).await.unwrap();
        assert_eq!(pool.active().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_add_endpoints_stops_at_first_error() {
        let pool = pool(reject_host("bad"), true);
        let result = pool
            .add_endpoints(vec![ep("http://a"), ep("http://bad"), ep("http://c")])
            .await;

        assert!(result.is_err());
        assert_eq!(pool.active().as_slice(), &[ep("http://a")]);
    }

    #[tokio::test]
    async fn test_quarantine_and_restore() {
        let pool = pool(always_ok(), true);
        pool.add_endpoints(vec![ep("http://a"), ep("http://b")]).await.unwrap();

        assert!(pool.quarantine(&ep("http://a")).await);
        assert_eq!(pool.active().as_slice(), &[ep("http://b")]);
        assert_eq!(pool.quarantined().as_slice(), &[ep("http://a")]);

        // Second quarantine does not duplicate.
        assert!(pool.quarantine(&ep("http://a")).await);
        assert_eq!(pool.quarantined().len(), 1);

        assert!(pool.restore(&ep("http://a")).await);
        assert_eq!(pool.active().len(), 2);
        assert!(pool.quarantined().is_empty());

        assert!(!pool.restore(&ep("http://a")).await);
    }

    #[tokio::test]
    async fn test_removed_endpoint_is_not_resurrected() {
        let pool = pool(always_ok(), true);
        pool.add_endpoint(ep("http://a")).await.unwrap();
        assert!(pool.remove_endpoint(&ep("http://a")).await);

        assert!(!pool.quarantine(&ep("http://a")).await);
        assert!(pool.active().is_empty());
        assert!(pool.quarantined().is_empty());
        assert!(!pool.remove_endpoint(&ep("http://a")).await);
    }

    #[tokio::test]
    async fn test_re_add_pulls_endpoint_out_of_quarantine() {
        let pool = pool(always_ok(), true);
        pool.add_endpoint(ep("http://a")).await.unwrap();
        pool.quarantine(&ep("http://a")).await;

        pool.add_endpoint(ep("http://a")).await.unwrap();
        assert_eq!(pool.active().as_slice(), &[ep("http://a")]);
        assert!(pool.quarantined().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_mutations_keep_sets_disjoint() {
        let pool = Arc::new(pool(always_ok(), false));
        let endpoints: Vec<Endpoint> = (0..8).map(|i| ep(&format!("http://10.0.0.{}", i))).collect();
        pool.add_endpoints(endpoints.clone()).await.unwrap();

        let mut tasks = Vec::new();
        for round in 0..4 {
            for endpoint in endpoints.clone() {
                let pool = pool.clone();
                tasks.push(tokio::spawn(async move {
                    if round % 2 == 0 {
                        pool.quarantine(&endpoint).await;
                    } else {
                        pool.restore(&endpoint).await;
                    }
                }));
            }
        }
        for task in tasks {
            task.await.unwrap();
        }

        let active = pool.active();
        let quarantined = pool.quarantined();
        assert_eq!(active.len() + quarantined.len(), endpoints.len());
        assert!(active.iter().all(|e| !quarantined.contains(e)));
    }
}
