//! Credentials and bearer tokens

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::wire::{nullable, utc_timestamp};
use crate::errors::Result;
use crate::validation::require_non_empty;

/// Client id/secret pair exchanged for a bearer token
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), client_secret: client_secret.into() }
    }

    /// # Errors
    /// Returns a validation error when either half is missing
    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.client_id, "A client ID is required to authenticate")?;
        require_non_empty(&self.client_secret, "A client secret is required to authenticate")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Bearer token returned by the `auth` endpoint
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToken {
    #[serde(rename = "Token", deserialize_with = "nullable")]
    pub token: String,
    #[serde(rename = "Expires_UTC", deserialize_with = "utc_timestamp")]
    pub expires_utc: Option<DateTime<Utc>>,
}

impl ApiToken {
    /// Strip the stray quote characters the server sometimes wraps the
    /// token in
    pub fn normalized(mut self) -> Self {
        self.token = self.token.replace('"', "");
        self
    }

    /// Whether the token expires within `threshold_secs` of now.
    ///
    /// A token without an expiry is trusted until the server rejects it.
    pub fn is_expiring(&self, threshold_secs: i64) -> bool {
        self.is_expiring_at(Utc::now(), threshold_secs)
    }

    pub fn is_expiring_at(&self, now: DateTime<Utc>, threshold_secs: i64) -> bool {
        self.expires_utc.is_some_and(|expires| expires - Duration::seconds(threshold_secs) <= now)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiToken")
            .field("token", &"<redacted>")
            .field("expires_utc", &self.expires_utc)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_quotes_from_token() {
        let token: ApiToken =
            serde_json::from_str(r#"{"Token": "\"abc.def\"", "Expires_UTC": "2030-01-01T00:00:00"}"#)
                .unwrap();
        assert_eq!(token.normalized().token, "abc.def");
    }

    #[test]
    fn expiry_threshold() {
        let now = Utc::now();
        let token = ApiToken {
            token: "t".into(),
            expires_utc: Some(now + Duration::seconds(30)),
        };
        assert!(token.is_expiring_at(now, 60));
        assert!(!token.is_expiring_at(now, 10));

        let expired = ApiToken { token: "t".into(), expires_utc: Some(now - Duration::seconds(1)) };
        assert!(expired.is_expiring_at(now, 0));
    }

    #[test]
    fn token_without_expiry_never_expires() {
        let token = ApiToken { token: "t".into(), expires_utc: None };
        assert!(!token.is_expiring(3600));
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = Credentials::new("id-1", "s3cr3t");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("id-1"));
        assert!(!rendered.contains("s3cr3t"));

        let token = ApiToken { token: "bearer-value".into(), expires_utc: None };
        assert!(!format!("{token:?}").contains("bearer-value"));
    }

    #[test]
    fn credentials_require_both_halves() {
        assert!(Credentials::new("", "x").validate().is_err());
        assert!(Credentials::new("x", " ").validate().is_err());
        assert!(Credentials::new("x", "y").validate().is_ok());
    }
}
