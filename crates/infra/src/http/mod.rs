//! Shared HTTP transport

pub mod client;

pub(crate) use client::error_body;
pub use client::{HttpClient, HttpClientBuilder};
