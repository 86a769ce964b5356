//! Port interfaces for the TrueSign API and blob storage

use std::path::Path;

use async_trait::async_trait;
use truesign_domain::{
    Document, DocumentDto, Envelope, EnvelopeDto, EnvelopeHistory, EnvelopeUser, Result, Signer,
};
use uuid::Uuid;

/// Envelope operations offered by the TrueSign API
///
/// Implementations validate their input before any network call and
/// authenticate lazily.
#[async_trait]
pub trait EnvelopeGateway: Send + Sync {
    /// Create a new envelope
    async fn create_envelope(&self, envelope: &EnvelopeDto) -> Result<Envelope>;

    /// Add document stubs to an envelope; each returned document carries an
    /// upload URL
    async fn add_files(&self, envelope_id: Uuid, documents: &[DocumentDto])
        -> Result<Vec<Document>>;

    async fn add_external_signer(&self, envelope_id: Uuid, signer: &Signer) -> Result<()>;

    async fn add_internal_signer(
        &self,
        envelope_id: Uuid,
        signer: &Signer,
        notify: bool,
    ) -> Result<()>;

    /// Hand the envelope to designers who place anchors before sending
    async fn set_designers(&self, envelope_id: Uuid, emails: &[String]) -> Result<()>;

    async fn set_creator(&self, envelope_id: Uuid, email: &str) -> Result<()>;

    /// Close the envelope and make it available to signers
    async fn send_envelope(&self, envelope_id: Uuid) -> Result<Envelope>;

    async fn get_envelope(&self, envelope_id: Uuid) -> Result<Envelope>;

    async fn delete_envelope(&self, envelope_id: Uuid) -> Result<()>;

    /// Users with access to the authenticated envelope type
    async fn list_users(&self) -> Result<Vec<EnvelopeUser>>;

    async fn list_envelopes(&self) -> Result<Vec<Envelope>>;

    async fn envelope_history(&self, envelope_id: Uuid) -> Result<Vec<EnvelopeHistory>>;
}

/// A local file holding downloaded bytes
///
/// Dropping the value deletes the file.
pub trait StagedFile: Send + Sync {
    fn path(&self) -> &Path;

    /// Size of the downloaded content in bytes
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Byte transfer to and from pre-signed storage URLs
#[async_trait]
pub trait BlobTransfer: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, upload_url: &str) -> Result<()>;

    async fn download(&self, download_url: &str) -> Result<Box<dyn StagedFile>>;
}
