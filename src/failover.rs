//! Dispatcher facade.
//!
//! Ties the pool, selector, executor and health monitor together behind the
//! public operations: add endpoints, execute requests, and run health checks.

use std::future::Future;
use std::sync::Arc;

use crate::config::schema::{FailoverConfig, RequestOptions};
use crate::error::{BoxError, Result};
use crate::health::active::{HealthCheckHandle, HealthMonitor};
use crate::health::check::ConnectivityCheck;
use crate::load_balancer::endpoint::Endpoint;
use crate::load_balancer::pool::PoolManager;
use crate::load_balancer::round_robin::RoundRobin;
use crate::resilience::executor::RequestExecutor;

/// Client-side failover dispatcher.
///
/// Cheap to share behind an `Arc`; all operations take `&self`.
#[derive(Debug)]
pub struct Failover {
    config: FailoverConfig,
    pool: Arc<PoolManager>,
    executor: RequestExecutor,
}

impl Failover {
    /// Create a dispatcher. Health checks are not running until
    /// [`Failover::start_health_checks`] is called.
    pub fn new<C>(check: C, config: FailoverConfig) -> Self
    where
        C: ConnectivityCheck,
    {
        let pool = Arc::new(PoolManager::new(
            Arc::new(check),
            config.check_timeout(),
            config.check_before_adding,
        ));
        let selector = Arc::new(RoundRobin::new(pool.active_set()));
        let executor = RequestExecutor::new(pool.clone(), selector);

        Self {
            config,
            pool,
            executor,
        }
    }

    pub fn config(&self) -> &FailoverConfig {
        &self.config
    }

    pub fn pool(&self) -> &Arc<PoolManager> {
        &self.pool
    }

    pub async fn add_endpoint(&self, endpoint: Endpoint) -> Result<()> {
        self.pool.add_endpoint(endpoint).await
    }

    pub async fn add_endpoints<I>(&self, endpoints: I) -> Result<()>
    where
        I: IntoIterator<Item = Endpoint>,
    {
        self.pool.add_endpoints(endpoints).await
    }

    pub async fn remove_endpoint(&self, endpoint: &Endpoint) -> bool {
        self.pool.remove_endpoint(endpoint).await
    }

    /// Run `request` against the next endpoint, retrying per the configured
    /// failure policy.
    pub async fn execute<F, Fut, E>(&self, request: F) -> Result<()>
    where
        F: FnMut(Endpoint) -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
        E: Into<BoxError>,
    {
        self.executor.execute(request, &self.config).await
    }

    /// Like [`Failover::execute`], with overrides for this call only.
    pub async fn execute_with<F, Fut, E>(&self, request: F, options: RequestOptions) -> Result<()>
    where
        F: FnMut(Endpoint) -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
        E: Into<BoxError>,
    {
        let local = options.apply(&self.config);
        self.executor.execute(request, &local).await
    }

    pub fn active_endpoints(&self) -> Arc<Vec<Endpoint>> {
        self.pool.active()
    }

    pub fn quarantined_endpoints(&self) -> Arc<Vec<Endpoint>> {
        self.pool.quarantined()
    }

    /// Build a monitor for this dispatcher without spawning it.
    pub fn health_monitor(&self) -> HealthMonitor {
        HealthMonitor::new(self.pool.clone(), self.config.health_check_interval())
    }

    /// Spawn the health-check loop on the current Tokio runtime.
    ///
    /// The loop stops when the returned handle is stopped or dropped.
    pub fn start_health_checks(&self) -> HealthCheckHandle {
        self.health_monitor().spawn()
    }
}
