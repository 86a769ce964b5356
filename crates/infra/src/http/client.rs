use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use truesign_domain::constants::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use truesign_domain::TrueSignError;

use crate::errors::InfraError;

/// Thin wrapper around a shared reqwest client.
///
/// Every request is sent exactly once. Failed calls surface to the caller,
/// which decides whether the operation can be repeated.
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
    pub fn new() -> Result<Self, TrueSignError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder.
    ///
    /// Only transport failures are errors here; non-success statuses are
    /// returned as responses.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, TrueSignError> {
        let request = builder.build().map_err(|err| TrueSignError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }
}

/// Body of a failed response, for error reporting.
///
/// A body that cannot be read is logged and reported as empty, so an empty
/// body in an error can come from either the server or this fallback.
pub(crate) async fn error_body(response: Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) => body,
        Err(err) => {
            debug!(%status, error = %err, "unable to read error response body");
            String::new()
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Build the client. Proxy settings come from the environment
    /// (`HTTP_PROXY`, `HTTPS_PROXY`, `NO_PROXY`).
    pub fn build(self) -> Result<HttpClient, TrueSignError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| TrueSignError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}
