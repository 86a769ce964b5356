//! Port interfaces for the host document management system

use std::path::Path;

use async_trait::async_trait;
use truesign_domain::Result;

/// The host document a workflow step runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDocument {
    pub id: String,
    pub name: String,
    pub document_type: String,
}

impl HostDocument {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        document_type: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), name: name.into(), document_type: document_type.into() }
    }
}

/// A note placed on a host document page, measured in 96 dpi pixels
#[derive(Debug, Clone, PartialEq)]
pub struct HostNote {
    pub id: String,
    pub text: String,
    pub page: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Trait for reading and updating host documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Bytes of the latest revision
    async fn read_bytes(&self, document_id: &str) -> Result<Vec<u8>>;

    /// Store `file` as a new revision of the document
    async fn store_revision(&self, document_id: &str, file: &Path, comment: &str) -> Result<()>;

    async fn set_keyword(&self, document_id: &str, keyword: &str, value: &str) -> Result<()>;

    async fn add_note(&self, document_id: &str, note_type: &str, text: &str) -> Result<()>;

    /// Notes of the given type, in page order
    async fn notes(&self, document_id: &str, note_type: &str) -> Result<Vec<HostNote>>;

    /// Move the document out of the waiting queue
    async fn mark_done(&self, document_id: &str) -> Result<()>;
}
