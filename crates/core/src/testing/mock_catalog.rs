//! Mock catalogs for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::catalog::{ArtworkCandidate, CatalogError, FlatCatalog, PagedCatalog, ResolvedArtwork};

/// Mock implementation of [`FlatCatalog`].
///
/// - Identifiers without a registered artwork resolve to `NotFound`
/// - Listing failures can be queued
/// - Listing and resolve calls are recorded
///
/// # Example
///
/// ```rust,ignore
/// use easel_core::testing::{fixtures, MockFlatCatalog};
///
/// let catalog = MockFlatCatalog::new();
/// catalog.set_identifiers(&["1", "2"]).await;
/// catalog.add_artwork("2", fixtures::artwork("https://img/2.jpg", "Irises", "Van Gogh")).await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockFlatCatalog {
    identifiers: Arc<RwLock<Vec<String>>>,
    artworks: Arc<RwLock<HashMap<String, ResolvedArtwork>>>,
    failing_resolves: Arc<RwLock<HashSet<String>>>,
    listing_failures: Arc<RwLock<u32>>,
    listing_times: Arc<RwLock<Vec<Instant>>>,
    resolve_calls: Arc<RwLock<Vec<String>>>,
}

impl MockFlatCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier list returned by listing.
    pub async fn set_identifiers(&self, identifiers: &[&str]) {
        *self.identifiers.write().await = identifiers.iter().map(|s| s.to_string()).collect();
    }

    /// Make `identifier` resolve to `artwork`.
    pub async fn add_artwork(&self, identifier: &str, artwork: ResolvedArtwork) {
        self.artworks
            .write()
            .await
            .insert(identifier.to_string(), artwork);
    }

    /// Make resolving `identifier` fail with an API error.
    pub async fn fail_resolve(&self, identifier: &str) {
        self.failing_resolves
            .write()
            .await
            .insert(identifier.to_string());
    }

    /// Fail the next `count` listing calls.
    pub async fn fail_next_listings(&self, count: u32) {
        *self.listing_failures.write().await = count;
    }

    /// Number of listing calls so far.
    pub async fn listing_calls(&self) -> u32 {
        self.listing_times.read().await.len() as u32
    }

    /// When each listing call started, in call order.
    pub async fn listing_times(&self) -> Vec<Instant> {
        self.listing_times.read().await.clone()
    }

    /// Identifiers passed to `resolve`, in call order.
    pub async fn resolve_calls(&self) -> Vec<String> {
        self.resolve_calls.read().await.clone()
    }
}

#[async_trait]
impl FlatCatalog for MockFlatCatalog {
    async fn list_candidates(&self) -> Result<Vec<String>, CatalogError> {
        self.listing_times.write().await.push(Instant::now());

        let mut failures = self.listing_failures.write().await;
        if *failures > 0 {
            *failures -= 1;
            return Err(CatalogError::Api {
                status: 503,
                message: "mock listing failure".to_string(),
            });
        }

        Ok(self.identifiers.read().await.clone())
    }

    async fn resolve(&self, identifier: &str) -> Result<ResolvedArtwork, CatalogError> {
        self.resolve_calls
            .write()
            .await
            .push(identifier.to_string());

        if self.failing_resolves.read().await.contains(identifier) {
            return Err(CatalogError::Api {
                status: 500,
                message: "mock resolve failure".to_string(),
            });
        }

        self.artworks
            .read()
            .await
            .get(identifier)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("no image for object {}", identifier)))
    }
}

/// Mock implementation of [`PagedCatalog`].
///
/// Pages without configured candidates are empty. Resolution builds
/// `{image_base}/{image_key}.jpg`.
#[derive(Debug, Clone)]
pub struct MockPagedCatalog {
    image_base: String,
    pages: Arc<RwLock<HashMap<u32, Vec<ArtworkCandidate>>>>,
    failing_pages: Arc<RwLock<HashSet<u32>>>,
    pages_listed: Arc<RwLock<Vec<u32>>>,
}

impl Default for MockPagedCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPagedCatalog {
    pub fn new() -> Self {
        Self::with_image_base("https://images.test")
    }

    pub fn with_image_base(image_base: &str) -> Self {
        Self {
            image_base: image_base.trim_end_matches('/').to_string(),
            pages: Arc::new(RwLock::new(HashMap::new())),
            failing_pages: Arc::new(RwLock::new(HashSet::new())),
            pages_listed: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// URL that `resolve` builds for an image key.
    pub fn image_url(&self, image_key: &str) -> String {
        format!("{}/{}.jpg", self.image_base, image_key)
    }

    pub async fn set_page(&self, page: u32, candidates: Vec<ArtworkCandidate>) {
        self.pages.write().await.insert(page, candidates);
    }

    /// Make listing `page` fail with an API error.
    pub async fn fail_page(&self, page: u32) {
        self.failing_pages.write().await.insert(page);
    }

    /// Pages listed so far, in call order.
    pub async fn pages_listed(&self) -> Vec<u32> {
        self.pages_listed.read().await.clone()
    }
}

#[async_trait]
impl PagedCatalog for MockPagedCatalog {
    async fn list_candidates(&self, page: u32) -> Result<Vec<ArtworkCandidate>, CatalogError> {
        self.pages_listed.write().await.push(page);

        if self.failing_pages.read().await.contains(&page) {
            return Err(CatalogError::Api {
                status: 502,
                message: "mock page failure".to_string(),
            });
        }

        Ok(self
            .pages
            .read()
            .await
            .get(&page)
            .cloned()
            .unwrap_or_default())
    }

    fn resolve(&self, candidate: &ArtworkCandidate) -> Result<ResolvedArtwork, CatalogError> {
        match candidate.image_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(ResolvedArtwork::new(
                self.image_url(key),
                candidate.title.as_deref(),
                candidate.artist_name.as_deref(),
            )),
            _ => Err(CatalogError::NotFound(candidate.identifier.clone())),
        }
    }
}
