//! Workflow adapter
//!
//! Drives the TrueSign API from a host document management workflow. A host
//! calls [`UploadService::run`] once per document in a batch, and later
//! [`DownloadService::run`] to bring the signed results back. Host state is
//! reached only through the [`DocumentStore`] and [`SessionStore`] ports.

pub mod anchors;
pub mod download;
pub mod outcome;
pub mod ports;
pub mod session;
pub mod signers;
pub mod upload;

pub use download::{DownloadService, DownloadSummary};
pub use outcome::WorkflowOutcome;
pub use ports::{DocumentStore, HostDocument, HostNote};
pub use session::{keys, InMemorySession, SessionStore, SessionValue};
pub use signers::SignerInputs;
pub use upload::{UploadProgress, UploadService};
