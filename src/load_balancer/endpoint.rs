//! Endpoint abstraction.
//!
//! # Responsibilities
//! - Represent a single addressable destination (scheme + host)
//! - Parse and validate raw addresses
//! - Compare endpoints by their canonical string form

use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{FailoverError, Result};

/// A network destination the dispatcher can route a request to.
///
/// Equality and hashing use the canonical serialization of the underlying
/// [`Url`], so `http://Example.com` and `http://example.com/` are the same
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Parse a raw address such as `http://10.0.0.1:8080`.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(FailoverError::InvalidEndpoint("empty address".to_string()));
        }

        let url = Url::parse(raw)
            .map_err(|e| FailoverError::InvalidEndpoint(format!("{}: {}", raw, e)))?;

        let endpoint = Self { url };
        endpoint.validate()?;
        Ok(endpoint)
    }

    /// Parse a trusted literal.
    ///
    /// # Panics
    /// Panics if `raw` is not a valid endpoint address.
    pub fn must_parse(raw: &str) -> Self {
        match Self::parse(raw) {
            Ok(endpoint) => endpoint,
            Err(e) => panic!("{}", e),
        }
    }

    /// Check that the endpoint has a non-empty canonical form and a host.
    pub fn validate(&self) -> Result<()> {
        if self.url.as_str().is_empty() {
            return Err(FailoverError::InvalidEndpoint("empty address".to_string()));
        }
        match self.url.host_str() {
            Some(host) if !host.is_empty() => Ok(()),
            _ => Err(FailoverError::InvalidEndpoint(format!(
                "{}: missing host",
                self.url
            ))),
        }
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    pub fn into_url(self) -> Url {
        self.url
    }
}

/// Unchecked conversion. Pool operations re-validate on insert.
impl From<Url> for Endpoint {
    fn from(url: Url) -> Self {
        Self { url }
    }
}

impl FromStr for Endpoint {
    type Err = FailoverError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
