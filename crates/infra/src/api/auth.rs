//! Bearer token management for the TrueSign API
//!
//! Tokens are fetched lazily from the `auth` endpoint and cached until they
//! come within the refresh threshold of their expiry. A 401 from any
//! resource call invalidates the cached token so the next call
//! re-authenticates.

use async_trait::async_trait;
use reqwest::Method;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use truesign_domain::{ApiToken, Credentials, Result, TrueSignError};
use url::Url;

use crate::http::HttpClient;

/// Source of bearer tokens for resource calls
///
/// Allows the client to be exercised with canned tokens in tests.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// A token that is valid for at least the refresh threshold.
    async fn access_token(&self) -> Result<String>;

    /// Fetch a fresh token regardless of the cached one.
    async fn authenticate(&self) -> Result<ApiToken>;

    /// Forget the cached token after the server rejected it.
    async fn invalidate(&self);
}

/// Caches the token issued for one set of client credentials
pub struct TokenManager {
    http: HttpClient,
    auth_url: Url,
    credentials: Credentials,
    refresh_threshold_secs: i64,
    state: Mutex<Option<ApiToken>>,
}

impl TokenManager {
    /// `base_url` must already be normalized to end with `/`.
    pub fn new(
        http: HttpClient,
        base_url: &Url,
        credentials: Credentials,
        refresh_threshold_secs: i64,
    ) -> Result<Self> {
        let auth_url = base_url
            .join("auth")
            .map_err(|e| TrueSignError::Config(format!("invalid auth URL: {e}")))?;

        Ok(Self {
            http,
            auth_url,
            credentials,
            refresh_threshold_secs: refresh_threshold_secs.max(0),
            state: Mutex::new(None),
        })
    }

    /// Whether a token is currently cached
    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.is_some()
    }

    /// The cached token, if any
    pub async fn current(&self) -> Option<ApiToken> {
        self.state.lock().await.clone()
    }

    #[instrument(skip(self), fields(url = %self.auth_url))]
    async fn request_token(&self) -> Result<ApiToken> {
        self.credentials.validate()?;

        let body = serde_json::json!({
            "client_id": self.credentials.client_id,
            "client_secret": self.credentials.client_secret,
        });
        let request = self.http.request(Method::POST, self.auth_url.clone()).json(&body);
        let response = self.http.send(request).await?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            TrueSignError::Auth(format!("failed to read authentication response: {e}"))
        })?;

        if !status.is_success() {
            warn!(%status, "authentication rejected");
            return Err(TrueSignError::Auth(text));
        }

        let token = serde_json::from_str::<ApiToken>(&text)
            .map_err(|e| TrueSignError::Auth(format!("unreadable authentication response: {e}")))?
            .normalized();

        if token.token.is_empty() {
            return Err(TrueSignError::Auth("authentication response carried no token".into()));
        }

        info!(expires_utc = ?token.expires_utc, "authenticated with TrueSign");
        Ok(token)
    }
}

#[async_trait]
impl AccessTokenProvider for TokenManager {
    async fn access_token(&self) -> Result<String> {
        // Held across the network call so concurrent callers share one login
        let mut state = self.state.lock().await;

        if let Some(token) = state.as_ref() {
            if !token.is_expiring(self.refresh_threshold_secs) {
                return Ok(token.token.clone());
            }
            debug!("cached token is about to expire, refreshing");
        }

        let token = self.request_token().await?;
        let value = token.token.clone();
        *state = Some(token);
        Ok(value)
    }

    async fn authenticate(&self) -> Result<ApiToken> {
        let mut state = self.state.lock().await;
        let token = self.request_token().await?;
        *state = Some(token.clone());
        Ok(token)
    }

    async fn invalidate(&self) {
        if self.state.lock().await.take().is_some() {
            debug!("cached token invalidated");
        }
    }
}
