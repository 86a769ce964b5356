//! Upload a batch of host documents into one envelope

use std::fmt;
use std::sync::Arc;

use chrono::Local;
use truesign_domain::validation::non_empty_entries;
use truesign_domain::{DocumentDto, EnvelopeDto, Result, SignerType, TrueSignError, WorkflowConfig};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::anchors::{anchors_from_notes, append_anchors, stored_anchors};
use super::outcome::WorkflowOutcome;
use super::ports::{DocumentStore, HostDocument};
use super::session::{keys, SessionStore, SessionValue};
use super::signers::SignerInputs;
use crate::gateway_ports::{BlobTransfer, EnvelopeGateway};

/// What an upload step left behind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadProgress {
    /// Document added; more documents follow in this batch
    Added { envelope_id: Uuid },
    /// Last document added and the envelope sent to its signers
    Sent { envelope_id: Uuid },
    /// Last document added and the envelope handed to designers
    Designing { envelope_id: Uuid },
}

impl UploadProgress {
    pub fn envelope_id(self) -> Uuid {
        match self {
            Self::Added { envelope_id }
            | Self::Sent { envelope_id }
            | Self::Designing { envelope_id } => envelope_id,
        }
    }
}

impl fmt::Display for UploadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { envelope_id } => write!(f, "Document added to envelope {envelope_id}"),
            Self::Sent { envelope_id } => write!(f, "Envelope {envelope_id} sent for signing"),
            Self::Designing { envelope_id } => {
                write!(f, "Envelope {envelope_id} assigned to designers")
            }
        }
    }
}

/// Adds host documents to an envelope and finalizes it after the last one
pub struct UploadService {
    gateway: Arc<dyn EnvelopeGateway>,
    transfer: Arc<dyn BlobTransfer>,
    documents: Arc<dyn DocumentStore>,
    config: WorkflowConfig,
}

impl UploadService {
    pub fn new(
        gateway: Arc<dyn EnvelopeGateway>,
        transfer: Arc<dyn BlobTransfer>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        Self { gateway, transfer, documents, config: WorkflowConfig::default() }
    }

    pub fn with_config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Host entry point: run one upload step and report the outcome
    pub async fn run(
        &self,
        document: &HostDocument,
        remaining_in_batch: usize,
        session: &dyn SessionStore,
    ) -> WorkflowOutcome {
        let result = self.upload_document(document, remaining_in_batch, session).await;
        WorkflowOutcome::capture(session, result)
    }

    /// Add `document` to the batch envelope, creating the envelope on the
    /// first call. When `remaining_in_batch` is zero the signers are added
    /// and the envelope is sent or handed to designers.
    ///
    /// # Errors
    /// Propagates validation, API, transfer and host failures.
    #[instrument(skip(self, document, session), fields(document_id = %document.id))]
    pub async fn upload_document(
        &self,
        document: &HostDocument,
        remaining_in_batch: usize,
        session: &dyn SessionStore,
    ) -> Result<UploadProgress> {
        let envelope_id = self.resolve_envelope(session).await?;

        let stub = DocumentDto::new(&*document.name).with_client_id(&*document.id);
        let added = self.gateway.add_files(envelope_id, &[stub]).await?;
        let remote = added.into_iter().next().ok_or_else(|| {
            TrueSignError::Internal(format!(
                "Failed to add document to envelope. Doc ID: {}",
                document.id
            ))
        })?;
        let upload_url = remote.upload_url.as_deref().ok_or_else(|| {
            TrueSignError::Transfer(format!("Document '{}' has no upload URL", remote.title))
        })?;

        let bytes = self.documents.read_bytes(&document.id).await?;
        debug!(bytes = bytes.len(), doc_id = %remote.id, "Uploading document content");
        self.transfer.upload(bytes, upload_url).await?;

        self.collect_anchors(document, remote.id, session).await?;

        if remaining_in_batch > 0 {
            return Ok(UploadProgress::Added { envelope_id });
        }
        self.finalize(envelope_id, session).await
    }

    async fn resolve_envelope(&self, session: &dyn SessionStore) -> Result<Uuid> {
        if let Some(existing) = session.text(keys::ENVELOPE_ID) {
            debug!(envelope_id = %existing, "Continuing batch envelope");
            return Uuid::parse_str(&existing).map_err(|e| {
                TrueSignError::validation(format!("Invalid envelope id '{existing}': {e}"))
            });
        }

        let title = session.text(keys::ENVELOPE_TITLE).unwrap_or_else(|| self.default_title());
        let mut dto = EnvelopeDto::new(title)
            .with_delivery_method(session.text(keys::OVERRIDE_DELIVERY_METHOD));
        if let Some(contact) = &self.config.contact {
            dto = dto.with_contact(contact.clone());
        }

        let envelope = self.gateway.create_envelope(&dto).await?;
        info!(envelope_id = %envelope.id, title = %dto.title, "Created envelope");
        session.set(keys::ENVELOPE_ID, SessionValue::Text(envelope.id.to_string()));
        Ok(envelope.id)
    }

    fn default_title(&self) -> String {
        format!("{} {}", self.config.title_prefix, Local::now().format("%-m/%-d/%Y %-I:%M %p"))
    }

    async fn collect_anchors(
        &self,
        document: &HostDocument,
        doc_id: Uuid,
        session: &dyn SessionStore,
    ) -> Result<()> {
        let Some(note_type) = session.text(keys::SIGNER_NOTE_ID) else {
            return Ok(());
        };
        if !SignerInputs::from_session(session).is_single_signer() {
            return Ok(());
        }

        let notes = self.documents.notes(&document.id, &note_type).await?;
        if notes.is_empty() {
            return Ok(());
        }
        let total = append_anchors(session, anchors_from_notes(doc_id, &notes))?;
        debug!(added = notes.len(), total, "Stored signer anchors");
        Ok(())
    }

    async fn finalize(&self, envelope_id: Uuid, session: &dyn SessionStore) -> Result<UploadProgress> {
        let signers = SignerInputs::from_session(session).assemble(stored_anchors(session)?);
        if signers.is_empty() {
            warn!(%envelope_id, "No signer email found in the session; continuing without signers");
        }
        let notify = session.flag(keys::NOTIFY_SIGNER, true);

        for signer in &signers {
            match signer.signer_type {
                SignerType::External => {
                    self.gateway.add_external_signer(envelope_id, signer).await?;
                }
                SignerType::Internal => {
                    self.gateway.add_internal_signer(envelope_id, signer, notify).await?;
                }
            }
        }
        info!(%envelope_id, signers = signers.len(), "Added signers");

        if let Some(creator) = session.text(keys::CREATOR) {
            self.gateway.set_creator(envelope_id, &creator).await?;
        }

        if session.flag(keys::DESIGN, false) {
            let designers = non_empty_entries(session.list(keys::DESIGNERS));
            self.gateway.set_designers(envelope_id, &designers).await?;
            return Ok(UploadProgress::Designing { envelope_id });
        }

        self.gateway.send_envelope(envelope_id).await?;
        info!(%envelope_id, "Envelope sent for signing");
        Ok(UploadProgress::Sent { envelope_id })
    }
}
