//! Museum catalog clients.
//!
//! Catalogs come in two shapes:
//! - **Flat**: one global list of opaque identifiers, each resolved with a
//!   per-object request (Metropolitan Museum of Art).
//! - **Paged**: a paginated listing that already embeds the display fields, so
//!   resolution is URL construction only (Art Institute of Chicago).
//!
//! [`CatalogSource`] tags a client with its shape so the selector can pick the
//! matching strategy.

mod artic;
mod http;
mod met;
mod types;

pub use artic::{ArticClient, ArticConfig, ARTIC_SOURCE_ID};
pub use met::{MetClient, MetConfig, MET_SOURCE_ID};
pub use types::*;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimited,

    /// Resource not found, or the artwork has no usable image.
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned a non-success status.
    #[error("API request failed: {status}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

/// A catalog exposing a single global identifier list.
#[async_trait]
pub trait FlatCatalog: Send + Sync {
    /// List every candidate identifier. The result is cacheable.
    async fn list_candidates(&self) -> Result<Vec<String>, CatalogError>;

    /// Fetch one object and resolve it to an image URL, title and author.
    ///
    /// Fails with [`CatalogError::NotFound`] when the object has no image.
    async fn resolve(&self, identifier: &str) -> Result<ResolvedArtwork, CatalogError>;
}

/// A catalog listed one page at a time.
#[async_trait]
pub trait PagedCatalog: Send + Sync {
    /// List one page (1-based), unfiltered by eligibility.
    async fn list_candidates(&self, page: u32) -> Result<Vec<ArtworkCandidate>, CatalogError>;

    /// Build the resolved artwork for a listed candidate. No network access.
    fn resolve(&self, candidate: &ArtworkCandidate) -> Result<ResolvedArtwork, CatalogError>;
}

/// A catalog client tagged with its access pattern.
#[derive(Clone)]
pub enum CatalogSource {
    Flat(Arc<dyn FlatCatalog>),
    Paged(Arc<dyn PagedCatalog>),
}

impl CatalogSource {
    pub fn flat(client: impl FlatCatalog + 'static) -> Self {
        Self::Flat(Arc::new(client))
    }

    pub fn paged(client: impl PagedCatalog + 'static) -> Self {
        Self::Paged(Arc::new(client))
    }

    /// Short name of the access pattern, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Flat(_) => "flat",
            Self::Paged(_) => "paged",
        }
    }
}

impl std::fmt::Debug for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CatalogSource").field(&self.kind()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyPages;

    #[async_trait]
    impl PagedCatalog for EmptyPages {
        async fn list_candidates(&self, _page: u32) -> Result<Vec<ArtworkCandidate>, CatalogError> {
            Ok(vec![])
        }

        fn resolve(&self, candidate: &ArtworkCandidate) -> Result<ResolvedArtwork, CatalogError> {
            Err(CatalogError::NotFound(candidate.identifier.clone()))
        }
    }

    #[test]
    fn test_source_kind() {
        let source = CatalogSource::paged(EmptyPages);
        assert_eq!(source.kind(), "paged");
        assert_eq!(format!("{:?}", source), "CatalogSource(\"paged\")");
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "API request failed: 503");

        let err = CatalogError::NotFound("object 42 has no image".to_string());
        assert_eq!(err.to_string(), "Not found: object 42 has no image");
    }
}
