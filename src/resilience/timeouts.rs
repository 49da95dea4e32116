//! Timeout enforcement for collaborator calls.
//!
//! Connectivity checks run while the pool's mutation lock may be held, so
//! every call gets a deadline. Expiry is reported as [`CheckTimedOut`].

use std::time::Duration;
use tokio::time;

use crate::error::{BoxError, CheckTimedOut};
use crate::health::check::ConnectivityCheck;
use crate::load_balancer::endpoint::Endpoint;

/// Run `check` against `endpoint`, failing if it takes longer than `limit`.
pub async fn check_with_timeout(
    check: &dyn ConnectivityCheck,
    endpoint: &Endpoint,
    limit: Duration,
) -> Result<(), BoxError> {
    match time::timeout(limit, check.check(endpoint)).await {
        Ok(result) => result,
        Err(_) => Err(CheckTimedOut(limit).into()),
    }
}
