//! Stored image records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Title shown for a stored image whose metadata cannot be read.
pub const FALLBACK_TITLE: &str = "Saved Image";

/// Author shown for a stored image whose metadata cannot be read.
pub const FALLBACK_AUTHOR: &str = "Unknown";

/// The current image as persisted on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub file_path: PathBuf,
    pub title: String,
    pub author: String,
}

/// Sidecar record written next to the current image.
///
/// Only `title` and `author` are required; records written by older versions
/// carry nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    /// Hex encoded SHA-256 of the image bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl ImageMetadata {
    pub fn fallback() -> Self {
        Self {
            title: FALLBACK_TITLE.to_string(),
            author: FALLBACK_AUTHOR.to_string(),
            source_id: None,
            image_url: None,
            fetched_at: None,
            sha256: None,
        }
    }
}
