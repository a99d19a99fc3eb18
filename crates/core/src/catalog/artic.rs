//! Art Institute of Chicago API client.
//!
//! API docs: https://api.artic.edu/docs
//!
//! Uses the plain `/artworks` listing rather than `/artworks/search`, which
//! rejects anonymous clients. Artwork type and licensing are filtered by the
//! caller; images are served through the IIIF endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::{build_client, get_json};
use super::types::{ArtworkCandidate, ResolvedArtwork, SourceDescriptor};
use super::{CatalogError, PagedCatalog};
use crate::transport::TransportConfig;

/// Source id of the ARTIC catalog.
pub const ARTIC_SOURCE_ID: &str = "artic";

const LISTING_FIELDS: &str = "id,title,artist_title,image_id,is_public_domain,artwork_type_title";

/// ARTIC API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticConfig {
    /// Base URL (default: https://api.artic.edu/api/v1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// IIIF image server base URL (default: https://www.artic.edu/iiif/2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iiif_base_url: Option<String>,
    /// Requested image width in pixels.
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    /// Artworks per listing page.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    /// Accepted `artwork_type_title`.
    #[serde(default = "default_artwork_type")]
    pub artwork_type: String,
}

fn default_image_width() -> u32 {
    1686
}

fn default_page_limit() -> u32 {
    100
}

fn default_artwork_type() -> String {
    "Painting".to_string()
}

impl Default for ArticConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            iiif_base_url: None,
            image_width: default_image_width(),
            page_limit: default_page_limit(),
            artwork_type: default_artwork_type(),
        }
    }
}

/// ARTIC API client.
pub struct ArticClient {
    client: Client,
    base_url: String,
    iiif_base_url: String,
    user_agent: String,
    image_width: u32,
    page_limit: u32,
    artwork_type: String,
}

impl ArticClient {
    /// Create a new ARTIC client.
    pub fn new(config: ArticConfig, transport: &TransportConfig) -> Result<Self, CatalogError> {
        let client = build_client(&transport.user_agent, transport.timeout_secs)?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.artic.edu/api/v1".to_string());
        let iiif_base_url = config
            .iiif_base_url
            .unwrap_or_else(|| "https://www.artic.edu/iiif/2".to_string());

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            iiif_base_url: iiif_base_url.trim_end_matches('/').to_string(),
            user_agent: transport.user_agent.clone(),
            image_width: config.image_width,
            page_limit: config.page_limit,
            artwork_type: config.artwork_type,
        })
    }

    pub fn descriptor() -> SourceDescriptor {
        SourceDescriptor::new(ARTIC_SOURCE_ID, "Art Institute of Chicago")
    }

    fn image_url(&self, image_id: &str) -> String {
        format!(
            "{}/{}/full/{},/0/default.jpg",
            self.iiif_base_url, image_id, self.image_width
        )
    }
}

#[async_trait]
impl PagedCatalog for ArticClient {
    async fn list_candidates(&self, page: u32) -> Result<Vec<ArtworkCandidate>, CatalogError> {
        let url = format!("{}/artworks", self.base_url);

        debug!("ARTIC listing: page={}, limit={}", page, self.page_limit);

        let request = self
            .client
            .get(&url)
            .header("AIC-User-Agent", &self.user_agent)
            .query(&[
                ("page", page.to_string()),
                ("limit", self.page_limit.to_string()),
                ("fields", LISTING_FIELDS.to_string()),
            ]);
        let listing: ArticListing = get_json(request, &format!("ARTIC page {}", page)).await?;

        Ok(listing
            .data
            .into_iter()
            .map(|artwork| artwork.into_candidate(&self.artwork_type))
            .collect())
    }

    fn resolve(&self, candidate: &ArtworkCandidate) -> Result<ResolvedArtwork, CatalogError> {
        match candidate.image_key.as_deref() {
            Some(image_id) if !image_id.is_empty() => Ok(ResolvedArtwork::new(
                self.image_url(image_id),
                candidate.title.as_deref(),
                candidate.artist_name.as_deref(),
            )),
            _ => Err(CatalogError::NotFound(format!(
                "artwork {} has no image",
                candidate.identifier
            ))),
        }
    }
}

// ============================================================================
// ARTIC API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ArticListing {
    #[serde(default)]
    data: Vec<ArticArtwork>,
}

#[derive(Debug, Deserialize)]
struct ArticArtwork {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist_title: Option<String>,
    #[serde(default)]
    image_id: Option<String>,
    #[serde(default)]
    is_public_domain: bool,
    #[serde(default)]
    artwork_type_title: Option<String>,
}

impl ArticArtwork {
    fn into_candidate(self, artwork_type: &str) -> ArtworkCandidate {
        let is_eligible =
            self.is_public_domain && self.artwork_type_title.as_deref() == Some(artwork_type);

        ArtworkCandidate {
            identifier: self.id.to_string(),
            title: self.title,
            artist_name: self.artist_title,
            image_key: self.image_id,
            is_eligible,
        }
    }
}
