//! Domain constants
//!
//! Centralized location for values shared by the client, the transfer layer
//! and the workflow services.

// API endpoints
pub const DEFAULT_API_URL: &str = "https://api.truesign.com/v1/";

// Transport defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REFRESH_THRESHOLD_SECS: i64 = 60;
pub const DEFAULT_USER_AGENT: &str = concat!("truesign-client/", env!("CARGO_PKG_VERSION"));

// Pre-signed blob uploads
pub const BLOB_TYPE_HEADER: &str = "x-ms-blob-type";
pub const BLOB_TYPE_BLOCK: &str = "BlockBlob";

// Host notes are measured in 96 dpi pixels, anchors in 72 dpi points
pub const HOST_PIXELS_PER_INCH: f64 = 96.0;
pub const POINTS_PER_INCH: f64 = 72.0;

// Host-side naming defaults
pub const DEFAULT_TITLE_PREFIX: &str = "Envelope";
pub const DEFAULT_REVISION_COMMENT: &str = "Downloaded from TrueSign Next";
pub const DEFAULT_REJECTION_NOTE_TYPE: &str = "Rejected Envelope";
pub const DEFAULT_SIGNED_KEYWORD: &str = "Signed";
pub const DEFAULT_STAMPED_KEYWORD: &str = "Stamped";

// Host document type whose bytes are a completed envelope notification
pub const COMPLETED_ENVELOPE_DOCUMENT_TYPE: &str = "TrueSign Completed Envelope";
