//! # TrueSign Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The authenticated REST client for envelopes, documents and signers
//! - Pre-signed blob uploads and scoped temporary downloads
//! - The shared HTTP transport and its error mapping
//! - Configuration loading from the environment and files
//!
//! ## Architecture
//! - Implements `EnvelopeGateway` and `BlobTransfer` from `truesign-core`
//! - Contains all I/O; the domain and core crates stay pure

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod transfer;

// Re-export commonly used items
pub use api::{AccessTokenProvider, TokenManager, TrueSignClient, TrueSignClientBuilder};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use transfer::{BlobClient, DownloadedFile};
