//! Envelopes: the signing transaction and its content

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::{Document, DocumentDto};
use super::signer::Signer;
use super::wire::{nullable, utc_timestamp};
use crate::errors::Result;
use crate::impl_wire_enum;
use crate::validation::require_non_empty;

/// Lifecycle of an envelope on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnvelopeStatus {
    /// Created and ready to receive files
    #[default]
    Created,
    /// Closed and waiting for signers
    ReadyToSign,
    /// Every file has been signed
    Signed,
    /// Signed, waiting for the asynchronous notification to go out
    ReadyToNotify,
    /// Notification sent or documents downloaded
    Completed,
    Deleted,
    /// A signer refused to sign
    Rejected,
}

impl_wire_enum!(EnvelopeStatus {
    Created => 0,
    ReadyToSign => 1,
    Signed => 2,
    ReadyToNotify => 3,
    Completed => 4,
    Deleted => 5,
    Rejected => 6,
});

impl EnvelopeStatus {
    /// No further transitions happen after these states
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Deleted | Self::Rejected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnvelopeHistoryType {
    Created,
    FileAdded,
    FileRemoved,
    Closed,
    MarkDeleted,
    Deleted,
    Viewed,
    Completed,
    ClientNotified,
    Downloaded,
    #[default]
    Other,
    Rejected,
}

impl_wire_enum!(EnvelopeHistoryType {
    Created => 0,
    FileAdded => 1,
    FileRemoved => 2,
    Closed => 3,
    MarkDeleted => 4,
    Deleted => 5,
    Viewed => 6,
    Completed => 7,
    ClientNotified => 8,
    Downloaded => 9,
    Other => 10,
    Rejected => 11,
});

/// Sender contact shown to external signers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(rename = "First_Name", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "Last_Name", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "Title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "Phone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Audit entry attached to an envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeHistory {
    #[serde(rename = "DateTime_UTC", deserialize_with = "utc_timestamp")]
    pub date_time_utc: Option<DateTime<Utc>>,
    #[serde(rename = "History_Type", deserialize_with = "nullable")]
    pub history_type: EnvelopeHistoryType,
    #[serde(rename = "Message", deserialize_with = "nullable")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeContent {
    #[serde(rename = "API_Version", deserialize_with = "nullable")]
    pub api_version: i32,
    #[serde(rename = "Title", deserialize_with = "nullable")]
    pub title: String,
    #[serde(rename = "Url")]
    pub url: Option<String>,
    #[serde(rename = "Signers", deserialize_with = "nullable")]
    pub signers: Vec<Signer>,
    #[serde(rename = "Contact")]
    pub contact: Option<Contact>,
    #[serde(rename = "Created_On_UTC", deserialize_with = "utc_timestamp")]
    pub created_on_utc: Option<DateTime<Utc>>,
    #[serde(rename = "Client_Data")]
    pub client_data: Option<String>,
    #[serde(rename = "Documents", deserialize_with = "nullable")]
    pub documents: Vec<Document>,
    #[serde(rename = "History", deserialize_with = "nullable")]
    pub history: Vec<EnvelopeHistory>,
}

/// A signing transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    #[serde(rename = "Id", deserialize_with = "nullable")]
    pub id: Uuid,
    #[serde(rename = "Type_Id", deserialize_with = "nullable")]
    pub type_id: Uuid,
    #[serde(rename = "Content", deserialize_with = "nullable")]
    pub content: EnvelopeContent,
    #[serde(rename = "Status", deserialize_with = "nullable")]
    pub status: EnvelopeStatus,
}

impl Envelope {
    pub fn is_rejected(&self) -> bool {
        self.status == EnvelopeStatus::Rejected
    }

    /// The most recent signer that rejected the envelope
    pub fn rejecting_signer(&self) -> Option<&Signer> {
        self.content.signers.iter().rev().find(|signer| signer.rejected)
    }

    /// Documents ready for download: signed or stamped ones, or all of them
    pub fn downloadable_documents(&self, finalized_only: bool) -> Vec<&Document> {
        self.content
            .documents
            .iter()
            .filter(|doc| !finalized_only || doc.is_finalized())
            .collect()
    }
}

/// Payload for creating an envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeDto {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Contact", skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(rename = "Client_Data", skip_serializing_if = "Option::is_none")]
    pub client_data: Option<String>,
    #[serde(rename = "Documents", skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentDto>>,
    /// Replaces the envelope type's configured delivery method
    #[serde(rename = "Override_Delivery_Method", skip_serializing_if = "Option::is_none")]
    pub override_delivery_method: Option<String>,
}

impl EnvelopeDto {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    pub fn with_documents(mut self, documents: Vec<DocumentDto>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    /// Blank overrides are ignored
    pub fn with_delivery_method(mut self, method: Option<String>) -> Self {
        self.override_delivery_method = method.filter(|m| !m.trim().is_empty());
        self
    }

    /// # Errors
    /// Returns a validation error when the title or any document title is
    /// empty
    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.title, "A title is required for the new envelope")?;
        self.documents.iter().flatten().try_for_each(DocumentDto::validate)
    }
}

/// A user with access to the authenticated envelope type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeUser {
    #[serde(rename = "Email", deserialize_with = "nullable")]
    pub email: String,
    #[serde(rename = "Name", deserialize_with = "nullable")]
    pub name: String,
}
