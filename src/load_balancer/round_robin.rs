//! Round-robin endpoint selection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::load_balancer::endpoint::Endpoint;
use crate::load_balancer::set::EndpointSet;

/// Round-robin selector over the live active set.
///
/// Stores a shared rotation counter. Only the counter modulo the size of the
/// snapshot taken at call time is meaningful; concurrent callers may skip or
/// revisit a slot but always get a member of that snapshot.
#[derive(Debug)]
pub struct RoundRobin {
    counter: AtomicUsize,
    endpoints: Arc<EndpointSet>,
}

impl RoundRobin {
    pub fn new(endpoints: Arc<EndpointSet>) -> Self {
        Self {
            counter: AtomicUsize::new(0),
            endpoints,
        }
    }

    /// Return the next endpoint in rotation, or `None` if the set is empty.
    pub fn next(&self) -> Option<Endpoint> {
        let snapshot = self.endpoints.load();
        if snapshot.is_empty() {
            return None;
        }

        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let endpoint = &snapshot[n % snapshot.len()];

        if endpoint.as_str().is_empty() {
            return None;
        }
        Some(endpoint.clone())
    }
}
