//! Domain types and models
//!
//! Typed mirrors of the TrueSign resources. Field names follow the vendor's
//! underscore-separated Pascal names on the wire.

pub mod document;
pub mod envelope;
pub mod signer;
pub mod token;

mod wire;

// Re-export for convenience
pub use document::{Document, DocumentDto, DocumentHistory};
pub use envelope::{
    Contact, Envelope, EnvelopeContent, EnvelopeDto, EnvelopeHistory, EnvelopeHistoryType,
    EnvelopeStatus, EnvelopeUser,
};
pub use signer::{AccessCode, Anchor, AnchorType, Signer, SignerDto, SignerType};
pub use token::{ApiToken, Credentials};
