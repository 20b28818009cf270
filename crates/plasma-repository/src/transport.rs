//! The three HTTP exchanges a publish run needs, behind a trait so the
//! transfer logic can be driven without a network.

use std::time::Duration;

use async_trait::async_trait;
use plasma_keyring::CredentialsItem;
use plasma_util::errors::{PublishError, PublishResult};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, Client, StatusCode};
use thiserror::Error;

use crate::auth;

/// A request that produced no HTTP response (DNS, connect, TLS, timeout...).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            "timed out"
        } else if e.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        Self::new(format!("{kind}: {e}"))
    }
}

/// HTTP operations against an artifacts repository.
#[async_trait]
pub trait RepositoryTransport: Send + Sync {
    /// Unauthenticated `GET url`, used to test reachability.
    async fn probe(&self, url: &str) -> Result<StatusCode, TransportError>;

    /// Authenticated `HEAD url`, used to validate credentials.
    async fn head(
        &self,
        url: &str,
        credentials: &CredentialsItem,
    ) -> Result<StatusCode, TransportError>;

    /// Authenticated `PUT url` streaming `file` (of `len` bytes) as the body.
    async fn put_file(
        &self,
        url: &str,
        credentials: &CredentialsItem,
        file: tokio::fs::File,
        len: u64,
    ) -> Result<StatusCode, TransportError>;
}

/// [`RepositoryTransport`] backed by a `reqwest` client.
pub struct HttpTransport {
    client: Client,
    probe_timeout: Duration,
}

impl HttpTransport {
    /// `probe_timeout` bounds the liveness probe only; `request_timeout`, if
    /// set, bounds every other request.
    pub fn new(probe_timeout: Duration, request_timeout: Option<Duration>) -> PublishResult<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("plasmactl-publish/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| PublishError::Network {
            message: format!("Failed to create HTTP client: {e}"),
        })?;
        Ok(Self {
            client,
            probe_timeout,
        })
    }
}

#[async_trait]
impl RepositoryTransport for HttpTransport {
    async fn probe(&self, url: &str) -> Result<StatusCode, TransportError> {
        tracing::debug!("GET {url} (timeout {:?})", self.probe_timeout);
        let resp = self
            .client
            .get(url)
            .timeout(self.probe_timeout)
            .send()
            .await?;
        Ok(resp.status())
    }

    async fn head(
        &self,
        url: &str,
        credentials: &CredentialsItem,
    ) -> Result<StatusCode, TransportError> {
        tracing::debug!("HEAD {url} as {}", credentials.username);
        let resp = auth::apply_auth(self.client.head(url), credentials)
            .send()
            .await?;
        Ok(resp.status())
    }

    async fn put_file(
        &self,
        url: &str,
        credentials: &CredentialsItem,
        file: tokio::fs::File,
        len: u64,
    ) -> Result<StatusCode, TransportError> {
        tracing::debug!("PUT {url} ({len} bytes) as {}", credentials.username);
        let resp = auth::apply_auth(self.client.put(url), credentials)
            .header(CONTENT_LENGTH, len)
            .body(Body::from(file))
            .send()
            .await?;
        Ok(resp.status())
    }
}
