//! Mocks for the host document store and blob transfer

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use truesign_core::{BlobTransfer, DocumentStore, HostNote, StagedFile};
use truesign_domain::{Result as DomainResult, TrueSignError};

/// In-memory document store that records every mutation.
#[derive(Default)]
pub struct MockDocumentStore {
    contents: Mutex<HashMap<String, Vec<u8>>>,
    note_fixtures: Mutex<HashMap<(String, String), Vec<HostNote>>>,
    pub revisions: Mutex<Vec<(String, PathBuf, String)>>,
    pub keywords: Mutex<Vec<(String, String, String)>>,
    pub notes_added: Mutex<Vec<(String, String, String)>>,
    pub done: Mutex<Vec<String>>,
    fail_mark_done: bool,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(self, document_id: &str, bytes: &[u8]) -> Self {
        self.contents.lock().unwrap().insert(document_id.to_string(), bytes.to_vec());
        self
    }

    pub fn with_notes(self, document_id: &str, note_type: &str, notes: Vec<HostNote>) -> Self {
        self.note_fixtures
            .lock()
            .unwrap()
            .insert((document_id.to_string(), note_type.to_string()), notes);
        self
    }

    pub fn failing_mark_done(mut self) -> Self {
        self.fail_mark_done = true;
        self
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn read_bytes(&self, document_id: &str) -> DomainResult<Vec<u8>> {
        self.contents
            .lock()
            .unwrap()
            .get(document_id)
            .cloned()
            .ok_or_else(|| TrueSignError::Host(format!("No document {document_id}")))
    }

    async fn store_revision(
        &self,
        document_id: &str,
        file: &Path,
        comment: &str,
    ) -> DomainResult<()> {
        self.revisions.lock().unwrap().push((
            document_id.to_string(),
            file.to_path_buf(),
            comment.to_string(),
        ));
        Ok(())
    }

    async fn set_keyword(&self, document_id: &str, keyword: &str, value: &str) -> DomainResult<()> {
        self.keywords.lock().unwrap().push((
            document_id.to_string(),
            keyword.to_string(),
            value.to_string(),
        ));
        Ok(())
    }

    async fn add_note(&self, document_id: &str, note_type: &str, text: &str) -> DomainResult<()> {
        self.notes_added.lock().unwrap().push((
            document_id.to_string(),
            note_type.to_string(),
            text.to_string(),
        ));
        Ok(())
    }

    async fn notes(&self, document_id: &str, note_type: &str) -> DomainResult<Vec<HostNote>> {
        Ok(self
            .note_fixtures
            .lock()
            .unwrap()
            .get(&(document_id.to_string(), note_type.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn mark_done(&self, document_id: &str) -> DomainResult<()> {
        if self.fail_mark_done {
            return Err(TrueSignError::Host("Document is not in the waiting queue".into()));
        }
        self.done.lock().unwrap().push(document_id.to_string());
        Ok(())
    }
}

/// Staged file that counts its own drops instead of touching the disk
pub struct FakeStagedFile {
    path: PathBuf,
    len: u64,
    dropped: Arc<AtomicUsize>,
}

impl StagedFile for FakeStagedFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn len(&self) -> u64 {
        self.len
    }
}

impl Drop for FakeStagedFile {
    fn drop(&mut self) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
    }
}

/// Blob transfer serving fixed download bodies and recording uploads.
#[derive(Default)]
pub struct MockTransfer {
    downloads: Mutex<HashMap<String, Vec<u8>>>,
    pub uploads: Mutex<Vec<(String, Vec<u8>)>>,
    pub staged: AtomicUsize,
    pub dropped: Arc<AtomicUsize>,
}

impl MockTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_download(self, url: &str, bytes: &[u8]) -> Self {
        self.downloads.lock().unwrap().insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn live_files(&self) -> usize {
        self.staged.load(Ordering::SeqCst) - self.dropped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobTransfer for MockTransfer {
    async fn upload(&self, bytes: Vec<u8>, upload_url: &str) -> DomainResult<()> {
        self.uploads.lock().unwrap().push((upload_url.to_string(), bytes));
        Ok(())
    }

    async fn download(&self, download_url: &str) -> DomainResult<Box<dyn StagedFile>> {
        let bytes = self
            .downloads
            .lock()
            .unwrap()
            .get(download_url)
            .cloned()
            .ok_or_else(|| TrueSignError::Transfer(format!("404 for {download_url}")))?;
        let index = self.staged.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeStagedFile {
            path: PathBuf::from(format!("/staged/{index}.pdf")),
            len: bytes.len() as u64,
            dropped: Arc::clone(&self.dropped),
        }))
    }
}
