//! # TrueSign Core
//!
//! Business logic layer - no HTTP, no host system code.
//!
//! This crate contains:
//! - Port interfaces (traits) for the TrueSign API, blob storage, the host
//!   document store and the host session
//! - The upload and download workflow services
//! - Signer assembly and anchor conversion
//! - Notification dispatch
//!
//! ## Architecture Principles
//! - Only depends on `truesign-domain`
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod gateway_ports;
pub mod notification;
pub mod workflow;

// Re-export specific items to avoid ambiguity
pub use gateway_ports::{BlobTransfer, EnvelopeGateway, StagedFile};
pub use notification::{EnvelopeNotificationHandler, LoggingHandler, NotificationDispatcher};
pub use workflow::{
    DocumentStore, DownloadService, DownloadSummary, HostDocument, HostNote, InMemorySession,
    SessionStore, SessionValue, UploadProgress, UploadService, WorkflowOutcome,
};
