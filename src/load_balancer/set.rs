//! Copy-on-write endpoint set.
//!
//! Readers take a single atomic load of an immutable `Vec<Endpoint>`; writers
//! build a new vector and swap it in whole, so a reader never observes a
//! partially updated set.

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::load_balancer::endpoint::Endpoint;

/// An ordered collection of unique endpoints with atomic whole-set replacement.
#[derive(Debug)]
pub struct EndpointSet {
    inner: ArcSwap<Vec<Endpoint>>,
}

impl EndpointSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<Vec<Endpoint>> {
        self.inner.load_full()
    }

    pub fn len(&self) -> usize {
        self.inner.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.load().is_empty()
    }

    pub fn contains(&self, endpoint: &Endpoint) -> bool {
        self.inner.load().iter().any(|e| e == endpoint)
    }

    /// Append `endpoint`, dropping any equal entry first so it moves to the
    /// end of rotation order.
    pub(crate) fn insert(&self, endpoint: &Endpoint) {
        self.inner.rcu(|current| {
            let mut next = without(current, endpoint);
            next.push(endpoint.clone());
            next
        });
    }

    /// Remove `endpoint`. Returns whether it was present.
    pub(crate) fn remove(&self, endpoint: &Endpoint) -> bool {
        let previous = self.inner.rcu(|current| without(current, endpoint));
        previous.iter().any(|e| e == endpoint)
    }
}

impl Default for EndpointSet {
    fn default() -> Self {
        Self::new()
    }
}

fn without(endpoints: &[Endpoint], endpoint: &Endpoint) -> Vec<Endpoint> {
    endpoints
        .iter()
        .filter(|e| *e != endpoint)
        .cloned()
        .collect()
}
