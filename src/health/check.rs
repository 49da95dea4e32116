//! Connectivity checks.
//!
//! # Responsibilities
//! - Define the collaborator contract used for pre-add validation and
//!   health scans
//! - Accept plain async closures as checks
//! - Provide an HTTP probe for the common case

use futures_util::future::BoxFuture;
use std::future::Future;
use std::time::Duration;

use crate::error::BoxError;
use crate::load_balancer::endpoint::Endpoint;

/// Decides whether an endpoint is currently reachable.
pub trait ConnectivityCheck: Send + Sync + 'static {
    fn check<'a>(&'a self, endpoint: &'a Endpoint) -> BoxFuture<'a, Result<(), BoxError>>;
}

impl<F, Fut> ConnectivityCheck for F
where
    F: Fn(Endpoint) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    fn check<'a>(&'a self, endpoint: &'a Endpoint) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(self(endpoint.clone()))
    }
}

/// HTTP `GET` probe. Any non-success status counts as a failure.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    path: String,
}

impl HttpProbe {
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), path)
    }

    pub fn with_client(client: reqwest::Client, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    /// Probe that gives up on its own after `timeout`.
    pub fn with_timeout(path: impl Into<String>, timeout: Duration) -> Result<Self, BoxError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("failover-dispatch-health-check")
            .no_proxy()
            .build()?;
        Ok(Self::with_client(client, path))
    }

    async fn probe(&self, endpoint: &Endpoint) -> Result<(), BoxError> {
        let target = endpoint.url().join(&self.path)?;
        let response = self.client.get(target).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = %endpoint, status = %status, "Probe failed: non-success status");
            return Err(format!("unexpected status {}", status).into());
        }
        Ok(())
    }
}

impl ConnectivityCheck for HttpProbe {
    fn check<'a>(&'a self, endpoint: &'a Endpoint) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(self.probe(endpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_closure_is_a_check() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let check = move |endpoint: Endpoint| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                if endpoint.host() == Some("good") {
                    Ok(())
                } else {
                    Err::<(), BoxError>("unreachable".into())
                }
            }
        };

        assert!(check.check(&Endpoint::must_parse("http://good")).await.is_ok());
        assert!(check.check(&Endpoint::must_parse("http://bad")).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_http_probe_connection_refused() {
        // Bind then drop to get a port nobody listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = HttpProbe::with_timeout("/health", Duration::from_secs(2)).unwrap();
        let endpoint = Endpoint::must_parse(&format!("http://{}", addr));
        assert!(probe.check(&endpoint).await.is_err());
    }
}
