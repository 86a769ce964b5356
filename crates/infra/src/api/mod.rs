//! TrueSign REST API client
//!
//! - [`auth`]: bearer token login, caching and proactive refresh
//! - [`client`]: envelope, document and signer operations
//!
//! All calls go through the shared [`crate::http::HttpClient`]. Secrets are
//! never logged; credential-bearing arguments are skipped in spans.

pub mod auth;
pub mod client;

pub use auth::{AccessTokenProvider, TokenManager};
pub use client::{TrueSignClient, TrueSignClientBuilder};
