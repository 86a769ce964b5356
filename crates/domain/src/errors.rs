//! Error types used throughout the TrueSign crates

use thiserror::Error;

/// Main error type for TrueSign operations
#[derive(Error, Debug)]
pub enum TrueSignError {
    /// A required field was missing or malformed. Raised before any network
    /// call is made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The authentication call failed or returned a non-success status.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A resource endpoint answered with a non-success status. The body is
    /// kept verbatim for diagnostics.
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Uploading to or downloading from a pre-signed URL failed.
    #[error("Transfer error: {0}")]
    Transfer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A host document store or session port failed.
    #[error("Host error: {0}")]
    Host(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TrueSignError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status carried by an [`TrueSignError::Api`] error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body carried by an [`TrueSignError::Api`] error
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    /// Whether the server rejected the bearer token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<serde_json::Error> for TrueSignError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for TrueSign operations
pub type Result<T> = std::result::Result<T, TrueSignError>;
