use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use tracksync_domain::TrackSyncError;

use crate::errors::InfraError;

/// HTTP client with optional timeout and single-attempt semantics.
///
/// Every request is sent exactly once; a status code of any kind is returned
/// as a response and only transport failures become errors.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, TrackSyncError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    ///
    /// # Errors
    /// `TrackSyncError::Network` when no response was received (connect,
    /// DNS, TLS, timeout); `InvalidInput` when the request cannot be built.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, TrackSyncError> {
        let request = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            TrackSyncError::from(infra)
        })?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                let infra: InfraError = err.into();
                Err(TrackSyncError::from(infra))
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl HttpClientBuilder {
    /// Total per-request timeout. Unset means no explicit timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Apply `timeout` only when one is configured.
    pub fn maybe_timeout(self, timeout: Option<Duration>) -> Self {
        match timeout {
            Some(timeout) => self.timeout(timeout),
            None => self,
        }
    }

    /// Override the default `tracksync/<version>` agent string.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, TrackSyncError> {
        let mut builder = ReqwestClient::builder().no_proxy();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let agent = self
            .user_agent
            .unwrap_or_else(|| format!("tracksync/{}", env!("CARGO_PKG_VERSION")));
        builder = builder.user_agent(agent);

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            TrackSyncError::from(infra)
        })?;

        Ok(HttpClient { client })
    }
}
