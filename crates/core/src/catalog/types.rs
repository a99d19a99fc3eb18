//! Types shared by all catalog clients.

use serde::{Deserialize, Serialize};

/// Title used when a catalog has no title for an artwork.
pub const UNTITLED: &str = "Untitled";

/// Author used when a catalog has no artist for an artwork.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Static description of a registered catalog source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Stable identifier (e.g. "met").
    pub id: String,
    /// Human readable name.
    pub display_name: String,
}

impl SourceDescriptor {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// An artwork as listed by a catalog, before selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtworkCandidate {
    /// Catalog specific artwork identifier.
    pub identifier: String,
    /// Artwork title, if the listing carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Artist name, if the listing carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    /// Source specific image key used to build the image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_key: Option<String>,
    /// Whether the listing satisfies the source's licensing/type constraints.
    #[serde(default)]
    pub is_eligible: bool,
}

impl ArtworkCandidate {
    /// Candidate carrying only an identifier (flat-list sources).
    pub fn from_identifier(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: None,
            artist_name: None,
            image_key: None,
            is_eligible: true,
        }
    }

    /// Whether the listing references an image.
    pub fn has_image(&self) -> bool {
        self.image_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Whether this candidate can be offered for display.
    pub fn is_selectable(&self) -> bool {
        self.has_image() && self.is_eligible
    }
}

/// The terminal result of a successful selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedArtwork {
    pub image_url: String,
    pub title: String,
    pub author: String,
}

impl ResolvedArtwork {
    /// Build a resolved artwork, applying the "Untitled" / "Unknown Artist"
    /// defaults to missing or blank fields.
    pub fn new(image_url: impl Into<String>, title: Option<&str>, author: Option<&str>) -> Self {
        Self {
            image_url: image_url.into(),
            title: non_blank(title).unwrap_or(UNTITLED).to_string(),
            author: non_blank(author).unwrap_or(UNKNOWN_ARTIST).to_string(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_artwork_defaults() {
        let artwork = ResolvedArtwork::new("https://img/1.jpg", None, Some("  "));
        assert_eq!(artwork.title, "Untitled");
        assert_eq!(artwork.author, "Unknown Artist");
    }

    #[test]
    fn test_resolved_artwork_keeps_values() {
        let artwork = ResolvedArtwork::new("u", Some("Water Lilies"), Some("Claude Monet"));
        assert_eq!(artwork.title, "Water Lilies");
        assert_eq!(artwork.author, "Claude Monet");
    }

    #[test]
    fn test_candidate_selectable() {
        let mut candidate = ArtworkCandidate {
            identifier: "27992".to_string(),
            title: Some("A Sunday on La Grande Jatte".to_string()),
            artist_name: None,
            image_key: Some("2d484387".to_string()),
            is_eligible: true,
        };
        assert!(candidate.is_selectable());

        candidate.is_eligible = false;
        assert!(!candidate.is_selectable());

        candidate.is_eligible = true;
        candidate.image_key = Some(String::new());
        assert!(!candidate.has_image());
        assert!(!candidate.is_selectable());
    }
}
