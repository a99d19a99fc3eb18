//! Source-independent image transport.
//!
//! Downloads image bytes over HTTP, following redirects explicitly up to a
//! configured limit, and probes image URLs for existence before selection.

mod config;
mod http;

pub use config::TransportConfig;
pub use http::HttpTransport;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while transferring an image.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Terminal non-success status.
    #[error("Failed to download: {status} ({url})")]
    Status { status: u16, url: String },

    /// Redirect chain longer than the configured limit.
    #[error("Too many redirects (limit {limit}) starting at {url}")]
    TooManyRedirects { limit: u32, url: String },

    /// URL or `Location` header could not be parsed.
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl TransportError {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Moves image bytes from a URL to memory.
#[async_trait]
pub trait ImageTransport: Send + Sync {
    /// Download the full body at `url`, following redirects.
    async fn download(&self, url: &str) -> Result<Vec<u8>, TransportError>;

    /// Lightweight existence check (HEAD). `Ok` means a success status.
    async fn probe(&self, url: &str) -> Result<(), TransportError>;
}
