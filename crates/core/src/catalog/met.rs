//! Metropolitan Museum of Art collection API client.
//!
//! API docs: https://metmuseum.github.io
//!
//! The search endpoint returns every matching object id in one response, and
//! each object must be fetched individually to learn its image URL.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::{build_client, get_json};
use super::types::{ResolvedArtwork, SourceDescriptor};
use super::{CatalogError, FlatCatalog};
use crate::transport::TransportConfig;

/// Source id of the Met catalog.
pub const MET_SOURCE_ID: &str = "met";

/// Met API client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetConfig {
    /// Base URL (default: https://collectionapi.metmuseum.org/public/collection/v1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Met API client.
pub struct MetClient {
    client: Client,
    base_url: String,
}

impl MetClient {
    /// Create a new Met client.
    pub fn new(config: MetConfig, transport: &TransportConfig) -> Result<Self, CatalogError> {
        let client = build_client(&transport.user_agent, transport.timeout_secs)?;

        let base_url = config.base_url.unwrap_or_else(|| {
            "https://collectionapi.metmuseum.org/public/collection/v1".to_string()
        });

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn descriptor() -> SourceDescriptor {
        SourceDescriptor::new(MET_SOURCE_ID, "Metropolitan Museum of Art")
    }
}

#[async_trait]
impl FlatCatalog for MetClient {
    async fn list_candidates(&self) -> Result<Vec<String>, CatalogError> {
        let url = format!("{}/search", self.base_url);

        debug!("Met search: listing paintings with images");

        let request = self.client.get(&url).query(&[
            ("hasImages", "true"),
            ("medium", "Paintings"),
            ("q", "*"),
        ]);
        let result: MetSearchResponse = get_json(request, "Met search").await?;

        let ids = result.object_ids.unwrap_or_default();
        if ids.is_empty() {
            return Err(CatalogError::NotFound("no paintings found".to_string()));
        }

        Ok(ids.into_iter().map(|id| id.to_string()).collect())
    }

    async fn resolve(&self, identifier: &str) -> Result<ResolvedArtwork, CatalogError> {
        let url = format!("{}/objects/{}", self.base_url, identifier);

        debug!("Met get object: id={}", identifier);

        let object: MetObject =
            get_json(self.client.get(&url), &format!("Met object {}", identifier)).await?;
        object.into_artwork(identifier)
    }
}

// ============================================================================
// Met API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct MetSearchResponse {
    #[serde(rename = "objectIDs", default)]
    object_ids: Option<Vec<u64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetObject {
    #[serde(default)]
    primary_image: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist_display_name: Option<String>,
}

impl MetObject {
    fn into_artwork(self, identifier: &str) -> Result<ResolvedArtwork, CatalogError> {
        match self.primary_image.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(ResolvedArtwork::new(
                url,
                self.title.as_deref(),
                self.artist_display_name.as_deref(),
            )),
            _ => Err(CatalogError::NotFound(format!(
                "no image for \"{}\" (object {})",
                self.title.as_deref().unwrap_or("Untitled"),
                identifier
            ))),
        }
    }
}
