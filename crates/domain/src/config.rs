//! Configuration management

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_REFRESH_THRESHOLD_SECS, DEFAULT_REJECTION_NOTE_TYPE,
    DEFAULT_REVISION_COMMENT, DEFAULT_SIGNED_KEYWORD, DEFAULT_STAMPED_KEYWORD,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TITLE_PREFIX, DEFAULT_USER_AGENT,
};
use crate::errors::{Result, TrueSignError};
use crate::types::{Contact, Credentials};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrueSignConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Connection settings for the TrueSign API
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base path, e.g. `https://api.truesign.com/v1/`
    pub base_url: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub timeout_seconds: u64,
    /// Re-authenticate when the token expires within this many seconds
    pub refresh_threshold_seconds: i64,
    pub user_agent: String,
}

impl ApiConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), client_secret: client_secret.into(), ..Self::default() }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.client_id.clone(), self.client_secret.clone())
    }

    /// # Errors
    /// Returns `TrueSignError::Config` for an unusable base URL or a
    /// negative refresh threshold
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(TrueSignError::Config(format!("Invalid API base URL: '{base}'")));
        }
        if self.refresh_threshold_seconds < 0 {
            return Err(TrueSignError::Config(
                "Refresh threshold must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            refresh_threshold_seconds: DEFAULT_REFRESH_THRESHOLD_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .field("refresh_threshold_seconds", &self.refresh_threshold_seconds)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Host-side naming used by the workflow services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Prefix of generated envelope titles, followed by a local timestamp
    pub title_prefix: String,
    pub contact: Option<Contact>,
    pub signed_keyword: String,
    pub stamped_keyword: String,
    pub rejection_note_type: String,
    pub revision_comment: String,
    /// Only download documents the server marked as signed or stamped
    pub signed_or_stamped_only: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            title_prefix: DEFAULT_TITLE_PREFIX.to_string(),
            contact: None,
            signed_keyword: DEFAULT_SIGNED_KEYWORD.to_string(),
            stamped_keyword: DEFAULT_STAMPED_KEYWORD.to_string(),
            rejection_note_type: DEFAULT_REJECTION_NOTE_TYPE.to_string(),
            revision_comment: DEFAULT_REVISION_COMMENT.to_string(),
            signed_or_stamped_only: true,
        }
    }
}
