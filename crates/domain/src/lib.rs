//! # TrueSign Domain
//!
//! Vendor resource models and business rules for the TrueSign e-signature
//! API.
//!
//! This crate contains:
//! - Envelope, document and signer models with their wire representation
//! - Request DTOs and the local validation applied before any network call
//! - The error taxonomy shared by every other crate
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other TrueSign crates
//! - No I/O: pure data, serde mappings and validation

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
