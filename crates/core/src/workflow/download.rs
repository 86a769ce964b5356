//! Bring signed envelopes back into the host system

use std::fmt;
use std::sync::Arc;

use truesign_domain::constants::COMPLETED_ENVELOPE_DOCUMENT_TYPE;
use truesign_domain::{Document, Envelope, Result, TrueSignError, WorkflowConfig};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::outcome::WorkflowOutcome;
use super::ports::{DocumentStore, HostDocument};
use super::session::{keys, SessionStore};
use crate::gateway_ports::{BlobTransfer, EnvelopeGateway};

/// What a download step did with an envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadSummary {
    /// Signed documents stored as new host revisions
    Downloaded { envelope_id: Uuid, documents: usize },
    /// Rejection notes added to the host documents
    Rejected { envelope_id: Uuid, notes: usize },
}

impl fmt::Display for DownloadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Downloaded { envelope_id, documents } => {
                write!(f, "Downloaded {documents} document(s) from envelope {envelope_id}")
            }
            Self::Rejected { envelope_id, notes } => {
                write!(f, "Envelope {envelope_id} was rejected; {notes} note(s) added")
            }
        }
    }
}

/// Stores signed documents as new revisions, or records a rejection
pub struct DownloadService {
    gateway: Arc<dyn EnvelopeGateway>,
    transfer: Arc<dyn BlobTransfer>,
    documents: Arc<dyn DocumentStore>,
    config: WorkflowConfig,
}

impl DownloadService {
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

    pub async fn run(&self, document: &HostDocument, session: &dyn SessionStore) -> WorkflowOutcome {
        let result = self.retrieve(document, session).await;
        WorkflowOutcome::capture(session, result)
    }

    /// Resolve the envelope for `document` and apply it to the host.
    ///
    /// A completed-envelope notification document carries the envelope JSON
    /// as its content. Any other document is matched through the envelope
    /// id in the session, and the TrueSign session keys are cleared once
    /// the envelope has been applied.
    ///
    /// # Errors
    /// Propagates API, transfer, host and decoding failures.
    #[instrument(skip(self, document, session), fields(document_id = %document.id))]
    pub async fn retrieve(
        &self,
        document: &HostDocument,
        session: &dyn SessionStore,
    ) -> Result<DownloadSummary> {
        if document.document_type.eq_ignore_ascii_case(COMPLETED_ENVELOPE_DOCUMENT_TYPE) {
            let envelope = self.read_envelope(document).await?;
            return self.apply(&envelope).await;
        }

        let raw_id = session.text(keys::ENVELOPE_ID).ok_or_else(|| {
            TrueSignError::validation(format!("{} property bag not found", keys::ENVELOPE_ID))
        })?;
        let envelope_id = Uuid::parse_str(&raw_id).map_err(|e| {
            TrueSignError::validation(format!("Invalid envelope id '{raw_id}': {e}"))
        })?;

        let envelope = self.gateway.get_envelope(envelope_id).await?;
        let summary = self.apply(&envelope).await?;

        for key in keys::DOWNLOAD_CLEANUP {
            session.remove(key);
        }
        Ok(summary)
    }

    async fn read_envelope(&self, document: &HostDocument) -> Result<Envelope> {
        let bytes = self.documents.read_bytes(&document.id).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            TrueSignError::Serialization(format!(
                "Unable to read document '{}' as a TrueSign envelope: {e}",
                document.name
            ))
        })
    }

    /// Rejected envelopes get notes, everything else gets downloaded
    pub async fn apply(&self, envelope: &Envelope) -> Result<DownloadSummary> {
        if envelope.is_rejected() {
            let notes = self.add_rejection_notes(envelope).await?;
            return Ok(DownloadSummary::Rejected { envelope_id: envelope.id, notes });
        }
        let documents = self.download_documents(envelope).await?;
        Ok(DownloadSummary::Downloaded { envelope_id: envelope.id, documents })
    }

    async fn add_rejection_notes(&self, envelope: &Envelope) -> Result<usize> {
        info!(envelope_id = %envelope.id, "Envelope has been rejected");
        let text = rejection_message(envelope);

        let mut added = 0;
        for doc in &envelope.content.documents {
            let Some(host_id) = doc.client_id.as_deref() else {
                warn!(title = %doc.title, "Document has no client id; skipping rejection note");
                continue;
            };
            self.documents.add_note(host_id, &self.config.rejection_note_type, &text).await?;
            added += 1;
        }
        Ok(added)
    }

    async fn download_documents(&self, envelope: &Envelope) -> Result<usize> {
        let documents = envelope.downloadable_documents(self.config.signed_or_stamped_only);
        debug!(
            envelope_id = %envelope.id,
            total = envelope.content.documents.len(),
            selected = documents.len(),
            "Downloading envelope documents"
        );

        for doc in &documents {
            self.download_document(doc).await?;
        }
        Ok(documents.len())
    }

    async fn download_document(&self, doc: &Document) -> Result<()> {
        let host_id = doc.client_id.as_deref().ok_or_else(|| {
            TrueSignError::Host(format!("Document '{}' has no client id", doc.title))
        })?;
        let url = doc.download_url.as_deref().ok_or_else(|| {
            TrueSignError::Transfer(format!("Document '{}' has no download URL", doc.title))
        })?;

        // Dropping the staged file removes it, so every exit path cleans up
        let staged = self.transfer.download(url).await?;
        self.documents.store_revision(host_id, staged.path(), &self.config.revision_comment).await?;
        self.documents
            .set_keyword(host_id, &self.config.signed_keyword, bool_keyword(doc.signed))
            .await?;
        self.documents
            .set_keyword(host_id, &self.config.stamped_keyword, bool_keyword(doc.stamped))
            .await?;
        drop(staged);

        if let Err(err) = self.documents.mark_done(host_id).await {
            warn!(error = %err, document_id = host_id, "Could not move document to done");
        }
        info!(document_id = host_id, "Stored signed revision");
        Ok(())
    }
}

/// Note text naming the last signer who rejected the envelope
pub fn rejection_message(envelope: &Envelope) -> String {
    let (name, reason) = envelope.rejecting_signer().map_or_else(
        || ("an unknown signer".to_string(), String::new()),
        |signer| (signer.full_name(), signer.reject_reason.clone().unwrap_or_default()),
    );
    format!("Envelope was rejected by signer {name} with the following reason: {reason}")
}

fn bool_keyword(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
