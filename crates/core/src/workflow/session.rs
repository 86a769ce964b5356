//! Batch-scoped property bag shared by consecutive workflow steps

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Property names read and written by the workflow services
pub mod keys {
    pub const ENVELOPE_ID: &str = "TrueSignEnvelopeId";
    pub const ENVELOPE_TITLE: &str = "TrueSignEnvelopeTitle";
    pub const OVERRIDE_DELIVERY_METHOD: &str = "TrueSignOverrideDeliveryMethod";
    pub const SIGNER_EMAIL: &str = "TrueSignSignerEmail";
    pub const FIRST_NAME: &str = "TrueSignFirstName";
    pub const LAST_NAME: &str = "TrueSignLastName";
    pub const EXTERNAL: &str = "TrueSignExternal";
    pub const CODE_DESCRIPTION: &str = "TrueSignCodeDesc";
    pub const CODE_VALUE: &str = "TrueSignCodeVal";
    pub const NOTIFY_SIGNER: &str = "TrueSignNotifySigner";
    pub const CREATOR: &str = "TrueSignCreator";
    pub const DESIGN: &str = "TrueSignDesign";
    pub const DESIGNERS: &str = "TrueSignDesigners";
    pub const SIGNER_NOTE_ID: &str = "TrueSignSignerNoteId";
    pub const ANCHORS: &str = "TrueSignAnchors";
    pub const ERROR: &str = "error";

    // Legacy keys cleared together with the envelope id
    pub const CLIENT_ID: &str = "TrueSignClientId";
    pub const CLIENT_SECRET: &str = "TrueSignClientSecret";
    pub const TITLE: &str = "TrueSignTitle";
    pub const EMAIL: &str = "TrueSignEmail";

    /// Keys removed once an envelope has been downloaded
    pub const DOWNLOAD_CLEANUP: [&str; 5] = [ENVELOPE_ID, CLIENT_ID, CLIENT_SECRET, TITLE, EMAIL];
}

/// A property value: a single string or an ordered list of strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValue {
    Text(String),
    List(Vec<String>),
}

impl SessionValue {
    /// Single value; a list yields its first entry
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(items) => items.first().map(String::as_str),
        }
    }

    /// Every entry; a single value becomes a one-element list
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text.clone()],
            Self::List(items) => items.clone(),
        }
    }
}

impl From<&str> for SessionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SessionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for SessionValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Trait for the host's session property bag
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<SessionValue>;

    fn set(&self, key: &str, value: SessionValue);

    fn remove(&self, key: &str);

    /// Trimmed single value, `None` when absent or blank
    fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(|value| value.as_text().map(|text| text.trim().to_string()))
            .filter(|text| !text.is_empty())
    }

    /// All entries in order, blank ones included so positions line up
    fn list(&self, key: &str) -> Vec<String> {
        self.get(key).map(|value| value.to_list()).unwrap_or_default()
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        self.text(key).map_or(default, |text| parse_flag(&text))
    }

    fn flags(&self, key: &str) -> Vec<bool> {
        self.list(key).iter().map(|entry| parse_flag(entry)).collect()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Session store backed by a map, for hosts without a property bag of their
/// own
#[derive(Debug, Default)]
pub struct InMemorySession {
    values: Mutex<HashMap<String, SessionValue>>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: impl Into<SessionValue>) -> Self {
        self.set(key, value.into());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.lock().unwrap_or_else(PoisonError::into_inner).contains_key(key)
    }
}

impl SessionStore for InMemorySession {
    fn get(&self, key: &str) -> Option<SessionValue> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set(&self, key: &str, value: SessionValue) {
        self.values.lock().unwrap_or_else(PoisonError::into_inner).insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.values.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
    }
}
