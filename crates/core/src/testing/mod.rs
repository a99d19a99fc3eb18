//! Testing utilities and mock implementations.
//!
//! Mocks for every collaborator seam of the acquisition pipeline, so the
//! selector and orchestrator can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use easel_core::testing::{fixtures, MockPagedCatalog, MockTransport, ScriptedRandomness};
//!
//! let catalog = MockPagedCatalog::new();
//! catalog.set_page(1, vec![fixtures::candidate("1", Some("img"), true)]).await;
//!
//! let transport = MockTransport::new();
//! transport.add_image(&catalog.image_url("img"), b"jpeg".to_vec()).await;
//!
//! let randomness = ScriptedRandomness::new().with_pages(&[1]);
//! ```

mod mock_catalog;
mod mock_surface;
mod mock_transport;

pub use mock_catalog::{MockFlatCatalog, MockPagedCatalog};
pub use mock_surface::{MockBackgroundSetter, RecordingSurface};
pub use mock_transport::MockTransport;

use std::collections::VecDeque;

use crate::selector::Randomness;

/// [`Randomness`] that replays scripted draws.
///
/// Indices and pages are served in order; once a script runs out, index draws
/// return 0 and page draws return 1. Permutations are always the identity.
/// Scripted values are clamped into the requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandomness {
    indices: VecDeque<usize>,
    pages: VecDeque<u32>,
}

impl ScriptedRandomness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indices(mut self, indices: &[usize]) -> Self {
        self.indices.extend(indices.iter().copied());
        self
    }

    pub fn with_pages(mut self, pages: &[u32]) -> Self {
        self.pages.extend(pages.iter().copied());
        self
    }
}

impl Randomness for ScriptedRandomness {
    fn index(&mut self, len: usize) -> usize {
        self.indices.pop_front().unwrap_or(0).min(len - 1)
    }

    fn page(&mut self, max_page: u32) -> u32 {
        self.pages.pop_front().unwrap_or(1).clamp(1, max_page)
    }

    fn permutation(&mut self, len: usize) -> Vec<usize> {
        (0..len).collect()
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{ArtworkCandidate, ResolvedArtwork};

    /// A listed candidate with an optional image key.
    pub fn candidate(
        identifier: &str,
        image_key: Option<&str>,
        is_eligible: bool,
    ) -> ArtworkCandidate {
        ArtworkCandidate {
            identifier: identifier.to_string(),
            title: Some(format!("Artwork {}", identifier)),
            artist_name: Some("Test Artist".to_string()),
            image_key: image_key.map(str::to_string),
            is_eligible,
        }
    }

    /// A resolved artwork.
    pub fn artwork(image_url: &str, title: &str, author: &str) -> ResolvedArtwork {
        ResolvedArtwork::new(image_url, Some(title), Some(author))
    }

    /// Bytes that start like a JPEG file.
    pub fn jpeg_bytes(tag: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
        bytes.extend_from_slice(tag.as_bytes());
        bytes
    }
}
