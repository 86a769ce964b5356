//! Envelope, document and signer operations against the TrueSign API
//!
//! Every operation validates its input locally, obtains a bearer token,
//! issues a single request and decodes the typed result. Nothing is
//! retried; non-success statuses become [`TrueSignError::Api`] with the body
//! kept verbatim.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use truesign_core::EnvelopeGateway;
use truesign_domain::constants::{
    DEFAULT_API_URL, DEFAULT_REFRESH_THRESHOLD_SECS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use truesign_domain::validation::{non_empty_entries, require_envelope_id, require_non_empty};
use truesign_domain::{
    ApiConfig, ApiToken, Credentials, Document, DocumentDto, Envelope, EnvelopeDto,
    EnvelopeHistory, EnvelopeUser, Result, Signer, TrueSignError,
};
use url::Url;
use uuid::Uuid;

use super::auth::{AccessTokenProvider, TokenManager};
use crate::http::{error_body, HttpClient};

/// Authenticated session against one TrueSign tenant
///
/// The token is shared by every operation issued through this instance, so
/// concurrent callers authenticate once.
pub struct TrueSignClient {
    http: HttpClient,
    base_url: Url,
    auth: Arc<dyn AccessTokenProvider>,
}

impl TrueSignClient {
    /// Client for `base_url` authenticating with the given credentials
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        Self::builder().base_url(base_url).credentials(credentials).build()
    }

    /// Client built from loaded configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        config.validate()?;
        Self::builder()
            .base_url(&config.base_url)
            .credentials(config.credentials())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .refresh_threshold_secs(config.refresh_threshold_seconds)
            .user_agent(&config.user_agent)
            .build()
    }

    pub fn builder() -> TrueSignClientBuilder {
        TrueSignClientBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Authenticate now instead of on the first resource call
    pub async fn authenticate(&self) -> Result<ApiToken> {
        self.auth.authenticate().await
    }

    /// Create an envelope, optionally with documents, contact and client data
    #[instrument(skip(self, envelope), fields(title = %envelope.title))]
    pub async fn create_envelope(&self, envelope: &EnvelopeDto) -> Result<Envelope> {
        envelope.validate()?;
        let url = self.endpoint("envelope")?;
        let response = self.call(Method::POST, url, Some(serde_json::to_value(envelope)?)).await?;
        let created: Envelope = decode(response, "envelope").await?;
        info!(envelope_id = %created.id, "envelope created");
        Ok(created)
    }

    /// Register document stubs; each returned document carries an upload URL
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn add_files(
        &self,
        envelope_id: Uuid,
        documents: &[DocumentDto],
    ) -> Result<Vec<Document>> {
        require_envelope_id(envelope_id)?;
        if documents.is_empty() {
            return Err(TrueSignError::validation("At least one document is required"));
        }
        documents.iter().try_for_each(DocumentDto::validate)?;

        let url = self.envelope_endpoint(envelope_id, "files")?;
        let response = self.call(Method::POST, url, Some(serde_json::to_value(documents)?)).await?;
        decode(response, "document list").await
    }

    #[instrument(skip(self, signer), fields(email = %signer.email))]
    pub async fn add_external_signer(&self, envelope_id: Uuid, signer: &Signer) -> Result<()> {
        require_envelope_id(envelope_id)?;
        signer.validate_external()?;

        let url = self.envelope_endpoint(envelope_id, "AddExternalSigner")?;
        self.call(Method::POST, url, Some(serde_json::to_value(signer)?)).await?;
        Ok(())
    }

    #[instrument(skip(self, signer), fields(email = %signer.email))]
    pub async fn add_internal_signer(
        &self,
        envelope_id: Uuid,
        signer: &Signer,
        notify: bool,
    ) -> Result<()> {
        require_envelope_id(envelope_id)?;
        signer.validate_internal()?;

        let mut url = self.envelope_endpoint(envelope_id, "AddInternalSigner")?;
        url.query_pairs_mut().append_pair("notify", if notify { "true" } else { "false" });
        self.call(Method::POST, url, Some(serde_json::to_value(signer)?)).await?;
        Ok(())
    }

    /// Blank entries are dropped; at least one email must remain
    #[instrument(skip(self, emails))]
    pub async fn set_designers(&self, envelope_id: Uuid, emails: &[String]) -> Result<()> {
        require_envelope_id(envelope_id)?;
        let designers = non_empty_entries(emails);
        if designers.is_empty() {
            return Err(TrueSignError::validation("At least one designer email is required"));
        }

        let url = self.envelope_endpoint(envelope_id, "SetDesigners")?;
        self.call(Method::POST, url, Some(serde_json::to_value(&designers)?)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_creator(&self, envelope_id: Uuid, email: &str) -> Result<()> {
        require_envelope_id(envelope_id)?;
        require_non_empty(email, "An email address is required for the envelope creator")?;

        let url = self.envelope_endpoint(envelope_id, "SetCreator")?;
        let body = serde_json::json!({ "Email": email.trim() });
        self.call(Method::POST, url, Some(body)).await?;
        Ok(())
    }

    /// Close the envelope and notify its signers
    #[instrument(skip(self))]
    pub async fn send_envelope(&self, envelope_id: Uuid) -> Result<Envelope> {
        require_envelope_id(envelope_id)?;
        let url = self.envelope_endpoint(envelope_id, "send")?;
        let response = self.call(Method::GET, url, None).await?;
        let sent: Envelope = decode(response, "envelope").await?;
        info!(status = %sent.status, "envelope sent");
        Ok(sent)
    }

    #[instrument(skip(self))]
    pub async fn get_envelope(&self, envelope_id: Uuid) -> Result<Envelope> {
        require_envelope_id(envelope_id)?;
        let url = self.endpoint(&format!("envelope/{envelope_id}"))?;
        let response = self.call(Method::GET, url, None).await?;
        decode(response, "envelope").await
    }

    #[instrument(skip(self))]
    pub async fn delete_envelope(&self, envelope_id: Uuid) -> Result<()> {
        require_envelope_id(envelope_id)?;
        let url = self.endpoint(&format!("envelope/{envelope_id}"))?;
        self.call(Method::DELETE, url, None).await?;
        info!("envelope deleted");
        Ok(())
    }

    /// Users of the tenant that may act as internal signers or designers
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<EnvelopeUser>> {
        let url = self.endpoint("envelope/Users")?;
        let response = self.call(Method::GET, url, None).await?;
        decode(response, "user list").await
    }

    #[instrument(skip(self))]
    pub async fn list_envelopes(&self) -> Result<Vec<Envelope>> {
        let url = self.endpoint("envelope")?;
        let response = self.call(Method::GET, url, None).await?;
        decode(response, "envelope list").await
    }

    #[instrument(skip(self))]
    pub async fn envelope_history(&self, envelope_id: Uuid) -> Result<Vec<EnvelopeHistory>> {
        require_envelope_id(envelope_id)?;
        let url = self.envelope_endpoint(envelope_id, "History")?;
        let response = self.call(Method::GET, url, None).await?;
        decode(response, "envelope history").await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| TrueSignError::Internal(format!("invalid endpoint '{path}': {e}")))
    }

    fn envelope_endpoint(&self, envelope_id: Uuid, action: &str) -> Result<Url> {
        self.endpoint(&format!("envelope/{envelope_id}/{action}"))
    }

    /// Issue one authorized request and reject non-success statuses
    async fn call(&self, method: Method, url: Url, body: Option<Value>) -> Result<Response> {
        let token = self.auth.access_token().await?;

        let mut request = self.http.request(method.clone(), url.clone()).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        if status.is_success() {
            debug!(%method, %url, %status, "TrueSign call succeeded");
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.auth.invalidate().await;
        }

        let body = error_body(response).await;
        warn!(%method, %url, %status, "TrueSign call failed");
        Err(TrueSignError::Api { status: status.as_u16(), body })
    }
}

async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status().as_u16();
    let text = response.text().await.map_err(|e| TrueSignError::Api {
        status,
        body: format!("failed to read {what} response: {e}"),
    })?;

    serde_json::from_str(&text).map_err(|e| TrueSignError::Api {
        status,
        body: format!("unable to decode {what} response: {e}"),
    })
}

#[async_trait]
impl EnvelopeGateway for TrueSignClient {
    async fn create_envelope(&self, envelope: &EnvelopeDto) -> Result<Envelope> {
        TrueSignClient::create_envelope(self, envelope).await
    }

    async fn add_files(&self, envelope_id: Uuid, documents: &[DocumentDto]) -> Result<Vec<Document>> {
        TrueSignClient::add_files(self, envelope_id, documents).await
    }

    async fn add_external_signer(&self, envelope_id: Uuid, signer: &Signer) -> Result<()> {
        TrueSignClient::add_external_signer(self, envelope_id, signer).await
    }

    async fn add_internal_signer(&self, envelope_id: Uuid, signer: &Signer, notify: bool) -> Result<()> {
        TrueSignClient::add_internal_signer(self, envelope_id, signer, notify).await
    }

    async fn set_designers(&self, envelope_id: Uuid, emails: &[String]) -> Result<()> {
        TrueSignClient::set_designers(self, envelope_id, emails).await
    }

    async fn set_creator(&self, envelope_id: Uuid, email: &str) -> Result<()> {
        TrueSignClient::set_creator(self, envelope_id, email).await
    }

    async fn send_envelope(&self, envelope_id: Uuid) -> Result<Envelope> {
        TrueSignClient::send_envelope(self, envelope_id).await
    }

    async fn get_envelope(&self, envelope_id: Uuid) -> Result<Envelope> {
        TrueSignClient::get_envelope(self, envelope_id).await
    }

    async fn delete_envelope(&self, envelope_id: Uuid) -> Result<()> {
        TrueSignClient::delete_envelope(self, envelope_id).await
    }

    async fn list_users(&self) -> Result<Vec<EnvelopeUser>> {
        TrueSignClient::list_users(self).await
    }

    async fn list_envelopes(&self) -> Result<Vec<Envelope>> {
        TrueSignClient::list_envelopes(self).await
    }

    async fn envelope_history(&self, envelope_id: Uuid) -> Result<Vec<EnvelopeHistory>> {
        TrueSignClient::envelope_history(self, envelope_id).await
    }
}

/// Builder for [`TrueSignClient`]
pub struct TrueSignClientBuilder {
    base_url: String,
    credentials: Option<Credentials>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
    timeout: Duration,
    refresh_threshold_secs: i64,
    user_agent: String,
}

impl Default for TrueSignClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            credentials: None,
            auth: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            refresh_threshold_secs: DEFAULT_REFRESH_THRESHOLD_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl TrueSignClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Use a custom token source instead of the credential login
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn refresh_threshold_secs(mut self, seconds: i64) -> Self {
        self.refresh_threshold_secs = seconds;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// # Errors
    ///
    /// Returns a configuration error when the base URL does not parse or
    /// neither credentials nor a token provider were supplied.
    pub fn build(self) -> Result<TrueSignClient> {
        let base_url = normalize_base_url(&self.base_url)?;
        let http = HttpClient::builder().timeout(self.timeout).user_agent(self.user_agent).build()?;

        let auth: Arc<dyn AccessTokenProvider> = match (self.auth, self.credentials) {
            (Some(auth), _) => auth,
            (None, Some(credentials)) => Arc::new(TokenManager::new(
                http.clone(),
                &base_url,
                credentials,
                self.refresh_threshold_secs,
            )?),
            (None, None) => {
                return Err(TrueSignError::Config(
                    "credentials or a token provider must be configured".into(),
                ))
            }
        };

        Ok(TrueSignClient { http, base_url, auth })
    }
}

/// Relative endpoints only resolve under the base path when it ends in `/`
fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash =
        if trimmed.ends_with('/') { trimmed.to_string() } else { format!("{trimmed}/") };
    Url::parse(&with_slash)
        .map_err(|e| TrueSignError::Config(format!("invalid base URL '{trimmed}': {e}")))
}
