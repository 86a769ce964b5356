//! Document bytes transfer through pre-signed blob URLs
//!
//! Uploads and downloads go straight to storage, so no bearer token is
//! attached. Downloads are staged in a temporary file owned by a
//! [`DownloadedFile`] guard.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Method;
use tempfile::NamedTempFile;
use tracing::{debug, instrument, warn};
use truesign_core::{BlobTransfer, StagedFile};
use truesign_domain::constants::{BLOB_TYPE_BLOCK, BLOB_TYPE_HEADER};
use truesign_domain::validation::require_non_empty;
use truesign_domain::{Result, TrueSignError};

use crate::errors::InfraError;
use crate::http::{error_body, HttpClient};

/// Temporary copy of a downloaded document
///
/// The file is removed when the guard is dropped unless [`keep`] is called.
///
/// [`keep`]: DownloadedFile::keep
#[derive(Debug)]
pub struct DownloadedFile {
    file: NamedTempFile,
    len: u64,
}

impl DownloadedFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Persist the file and hand its path to the caller, who then owns the
    /// cleanup.
    pub fn keep(self) -> Result<PathBuf> {
        let (_file, path) = self
            .file
            .keep()
            .map_err(|e| TrueSignError::from(InfraError::from(e.error)))?;
        Ok(path)
    }
}

impl StagedFile for DownloadedFile {
    fn path(&self) -> &Path {
        DownloadedFile::path(self)
    }

    fn len(&self) -> u64 {
        self.len
    }
}

/// Client for pre-signed upload and download URLs
#[derive(Clone)]
pub struct BlobClient {
    http: HttpClient,
}

impl BlobClient {
    pub fn new() -> Result<Self> {
        Ok(Self { http: HttpClient::new()? })
    }

    pub fn with_http(http: HttpClient) -> Self {
        Self { http }
    }

    /// PUT `bytes` as a block blob
    #[instrument(skip(self, bytes, upload_url), fields(len = bytes.len()))]
    pub async fn upload(&self, bytes: Vec<u8>, upload_url: &str) -> Result<()> {
        require_non_empty(upload_url, "An upload URL is required")?;

        let request = self
            .http
            .request(Method::PUT, upload_url)
            .header(BLOB_TYPE_HEADER, BLOB_TYPE_BLOCK)
            .body(bytes);
        let response = self.http.send(request).await.map_err(as_transfer)?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            warn!(%status, "blob upload rejected");
            return Err(TrueSignError::Transfer(format!(
                "upload failed with status {status}: {body}"
            )));
        }

        debug!(%status, "blob uploaded");
        Ok(())
    }

    /// Upload the contents of a local file
    pub async fn upload_file(&self, file: &Path, upload_url: &str) -> Result<()> {
        let bytes = tokio::fs::read(file).await.map_err(|e| {
            TrueSignError::Transfer(format!("unable to read '{}': {e}", file.display()))
        })?;
        self.upload(bytes, upload_url).await
    }

    /// GET the blob into a fresh temporary file
    #[instrument(skip(self, download_url))]
    pub async fn download(&self, download_url: &str) -> Result<DownloadedFile> {
        require_non_empty(download_url, "A download URL is required")?;

        let response = self
            .http
            .send(self.http.request(Method::GET, download_url))
            .await
            .map_err(as_transfer)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "blob download rejected");
            return Err(TrueSignError::Transfer(format!("download failed with status {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TrueSignError::Transfer(format!("download interrupted: {e}")))?;

        let file = tempfile::Builder::new()
            .prefix("truesign-")
            .suffix(".download")
            .tempfile()
            .map_err(staging_failed)?;
        // The guard owns the path from here on, so a failed write still cleans up
        tokio::fs::write(file.path(), &bytes).await.map_err(staging_failed)?;

        debug!(len = bytes.len(), path = %file.path().display(), "blob staged");
        Ok(DownloadedFile { file, len: bytes.len() as u64 })
    }
}

fn staging_failed(err: std::io::Error) -> TrueSignError {
    TrueSignError::Transfer(format!("unable to stage download: {err}"))
}

fn as_transfer(err: TrueSignError) -> TrueSignError {
    match err {
        TrueSignError::Transfer(_) | TrueSignError::Validation(_) => err,
        other => TrueSignError::Transfer(other.to_string()),
    }
}

#[async_trait]
impl BlobTransfer for BlobClient {
    async fn upload(&self, bytes: Vec<u8>, upload_url: &str) -> Result<()> {
        BlobClient::upload(self, bytes, upload_url).await
    }

    async fn download(&self, download_url: &str) -> Result<Box<dyn StagedFile>> {
        let staged = BlobClient::download(self, download_url).await?;
        Ok(Box::new(staged))
    }
}
