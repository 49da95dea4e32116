//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe every active and quarantined endpoint
//! - Quarantine active endpoints that fail
//! - Restore quarantined endpoints that pass
//!
//! Each tick runs both scans concurrently and waits for both before the next
//! tick. A single failed check only affects that endpoint.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::schema::DEFAULT_HEALTH_CHECK_INTERVAL_MS;
use crate::lifecycle::Shutdown;
use crate::load_balancer::pool::PoolManager;

/// Outcome of one reconciliation tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Active endpoints moved to quarantine.
    pub quarantined: usize,
    /// Quarantined endpoints moved back to active.
    pub restored: usize,
}

pub struct HealthMonitor {
    pool: Arc<PoolManager>,
    interval: Duration,
}

impl HealthMonitor {
    /// A zero `interval` falls back to the default.
    pub fn new(pool: Arc<PoolManager>, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            tracing::warn!("Zero health check interval, using default");
            Duration::from_millis(DEFAULT_HEALTH_CHECK_INTERVAL_MS)
        } else {
            interval
        };
        Self { pool, interval }
    }

    /// Spawn the loop on the current Tokio runtime.
    pub fn spawn(self) -> HealthCheckHandle {
        let shutdown = Shutdown::new();
        let receiver = shutdown.subscribe();
        let task = tokio::spawn(self.run(receiver));
        HealthCheckHandle {
            shutdown,
            task: Some(task),
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Health monitor starting");

        // First scan happens one full interval after start.
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.check_all().await;
                    if report != ScanReport::default() {
                        tracing::info!(
                            quarantined = report.quarantined,
                            restored = report.restored,
                            "Health check tick changed pool membership"
                        );
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Run one reconciliation tick.
    pub async fn check_all(&self) -> ScanReport {
        if self.pool.active().is_empty() && self.pool.quarantined().is_empty() {
            tracing::trace!("Pool is empty, skipping health check tick");
            return ScanReport::default();
        }

        let (quarantined, restored) = tokio::join!(self.scan_active(), self.scan_quarantined());
        ScanReport {
            quarantined,
            restored,
        }
    }

    async fn scan_active(&self) -> usize {
        let snapshot = self.pool.active();
        let mut moved = 0;

        for endpoint in snapshot.iter() {
            if let Err(e) = self.pool.probe(endpoint).await {
                tracing::warn!(endpoint = %endpoint, error = %e, "Health check failed");
                if self.pool.quarantine(endpoint).await {
                    moved += 1;
                }
            }
        }
        moved
    }

    async fn scan_quarantined(&self) -> usize {
        let snapshot = self.pool.quarantined();
        let mut moved = 0;

        for endpoint in snapshot.iter() {
            match self.pool.probe(endpoint).await {
                Ok(()) => {
                    if self.pool.restore(endpoint).await {
                        moved += 1;
                    }
                }
                Err(e) => {
                    tracing::debug!(endpoint = %endpoint, error = %e, "Quarantined endpoint still failing");
                }
            }
        }
        moved
    }
}

/// Owner of a running health monitor.
///
/// Dropping the handle signals the loop to stop; [`HealthCheckHandle::stop`]
/// also waits for it to exit.
pub struct HealthCheckHandle {
    shutdown: Shutdown,
    task: Option<JoinHandle<()>>,
}

impl HealthCheckHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub async fn stop(mut self) {
        self.shutdown.trigger();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Health monitor task failed");
            }
        }
    }
}

impl Drop for HealthCheckHandle {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
