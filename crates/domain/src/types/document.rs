//! Documents inside an envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::wire::{nullable, utc_timestamp};
use crate::errors::Result;
use crate::validation::require_non_empty;

/// A file held by an envelope
///
/// Created when a stub is added to an envelope. The server fills in the
/// pre-signed `upload_url`, and later the `download_url` and the
/// signed/stamped flags as signing proceeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    #[serde(rename = "Id", deserialize_with = "nullable")]
    pub id: Uuid,
    #[serde(rename = "Title", deserialize_with = "nullable")]
    pub title: String,
    /// Correlation id chosen by the caller, typically the host document id
    #[serde(rename = "Client_Id")]
    pub client_id: Option<String>,
    #[serde(rename = "Upload_Url")]
    pub upload_url: Option<String>,
    #[serde(rename = "Download_Url")]
    pub download_url: Option<String>,
    #[serde(rename = "Signed", deserialize_with = "nullable")]
    pub signed: bool,
    #[serde(rename = "Stamped", deserialize_with = "nullable")]
    pub stamped: bool,
    #[serde(rename = "History", deserialize_with = "nullable")]
    pub history: Vec<DocumentHistory>,
}

impl Document {
    /// Whether the server has produced a final rendition for this document
    pub fn is_finalized(&self) -> bool {
        self.signed || self.stamped
    }
}

/// Document stub sent when adding files to an envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDto {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Client_Id", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl DocumentDto {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), client_id: None }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// # Errors
    /// Returns a validation error when the title is empty
    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.title, "A document must contain a title")
    }
}

/// Audit entry attached to a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentHistory {
    #[serde(rename = "Date_Time_UTC", deserialize_with = "utc_timestamp")]
    pub date_time_utc: Option<DateTime<Utc>>,
    #[serde(rename = "Message", deserialize_with = "nullable")]
    pub message: String,
    #[serde(rename = "Email")]
    pub email: Option<String>,
}
