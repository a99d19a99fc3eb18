//! Random eligible artwork selection.
//!
//! Two strategies, dispatched on [`CatalogSource`]:
//! - **Flat**: draw identifiers from the cached list and resolve each one,
//!   up to `max_attempts` draws.
//! - **Paged**: draw a random page, keep the eligible candidates with images,
//!   probe them in shuffled order and return the first whose image answers.
//!   An empty page or a page where every probe fails moves on to a new random
//!   page, up to `max_page_draws` pages.
//!
//! Per-candidate failures (network, parse, missing image) never surface; they
//! only move the search on to the next candidate or page.

mod config;
mod random;

pub use config::SelectionConfig;
pub use random::{Randomness, StdRandomness};

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::CatalogCache;
use crate::catalog::{
    ArtworkCandidate, CatalogError, CatalogSource, FlatCatalog, PagedCatalog, ResolvedArtwork,
};
use crate::transport::ImageTransport;

/// Errors that end a selection.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Every allowed draw failed to produce an eligible artwork.
    #[error("could not find an eligible artwork after {attempts} attempts")]
    Exhausted { attempts: u32 },

    /// The flat catalog's identifier list could not be fetched.
    #[error("failed to list catalog: {0}")]
    Listing(#[from] CatalogError),

    /// The flat catalog listed no identifiers at all.
    #[error("catalog {0} lists no artworks")]
    EmptyCatalog(String),
}

/// Picks a random eligible artwork from a catalog.
pub struct CandidateSelector {
    config: SelectionConfig,
    cache: Arc<CatalogCache>,
    transport: Arc<dyn ImageTransport>,
    randomness: Mutex<Box<dyn Randomness>>,
}

impl CandidateSelector {
    /// Create a selector drawing from OS-seeded randomness.
    pub fn new(
        config: SelectionConfig,
        cache: Arc<CatalogCache>,
        transport: Arc<dyn ImageTransport>,
    ) -> Self {
        Self {
            config,
            cache,
            transport,
            randomness: Mutex::new(Box::new(StdRandomness::from_entropy())),
        }
    }

    /// Replace the source of random draws.
    pub fn with_randomness(mut self, randomness: impl Randomness + 'static) -> Self {
        self.randomness = Mutex::new(Box::new(randomness));
        self
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Drop any identifiers cached for `source_id`.
    pub async fn forget_source(&self, source_id: &str) {
        self.cache.invalidate(source_id).await;
    }

    /// Select a random eligible artwork from `source`.
    ///
    /// `source_id` keys the identifier cache for flat catalogs.
    pub async fn select_random_eligible(
        &self,
        source_id: &str,
        source: &CatalogSource,
    ) -> Result<ResolvedArtwork, SelectionError> {
        match source {
            CatalogSource::Flat(catalog) => self.select_flat(source_id, catalog.as_ref()).await,
            CatalogSource::Paged(catalog) => self.select_paged(source_id, catalog.as_ref()).await,
        }
    }

    fn draw<T>(&self, f: impl FnOnce(&mut dyn Randomness) -> T) -> T {
        let mut randomness = self.randomness.lock().unwrap_or_else(PoisonError::into_inner);
        f(randomness.as_mut())
    }

    async fn select_flat(
        &self,
        source_id: &str,
        catalog: &dyn FlatCatalog,
    ) -> Result<ResolvedArtwork, SelectionError> {
        let identifiers = self
            .cache
            .get_or_fetch(source_id, || catalog.list_candidates())
            .await?;

        if identifiers.is_empty() {
            return Err(SelectionError::EmptyCatalog(source_id.to_string()));
        }

        for attempt in 1..=self.config.max_attempts {
            let index = self.draw(|r| r.index(identifiers.len()));
            let identifier = &identifiers[index];

            match catalog.resolve(identifier).await {
                Ok(artwork) => {
                    info!(
                        "Selected \"{}\" by {} from {} (attempt {})",
                        artwork.title, artwork.author, source_id, attempt
                    );
                    return Ok(artwork);
                }
                Err(CatalogError::NotFound(reason)) => {
                    debug!("{}, trying another...", reason);
                }
                Err(e) => {
                    debug!("Failed to fetch object {}: {}, trying another...", identifier, e);
                }
            }
        }

        Err(SelectionError::Exhausted {
            attempts: self.config.max_attempts,
        })
    }

    async fn select_paged(
        &self,
        source_id: &str,
        catalog: &dyn PagedCatalog,
    ) -> Result<ResolvedArtwork, SelectionError> {
        for draw in 1..=self.config.max_page_draws {
            let page = self.draw(|r| r.page(self.config.max_page));

            let candidates = match catalog.list_candidates(page).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!("Failed to list {} page {}: {}, trying another page", source_id, page, e);
                    continue;
                }
            };

            let eligible: Vec<ArtworkCandidate> = candidates
                .into_iter()
                .filter(|c| c.is_selectable())
                .collect();

            if eligible.is_empty() {
                debug!("No eligible artworks on page {}, trying another...", page);
                continue;
            }

            if let Some(artwork) = self.first_available(catalog, &eligible).await {
                info!(
                    "Selected \"{}\" by {} from {} page {} (page draw {})",
                    artwork.title, artwork.author, source_id, page, draw
                );
                return Ok(artwork);
            }

            debug!("All images on page {} unavailable, trying another page", page);
        }

        Err(SelectionError::Exhausted {
            attempts: self.config.max_page_draws,
        })
    }

    /// Probe the candidates in a random order and return the first whose image
    /// answers with a success status.
    async fn first_available(
        &self,
        catalog: &dyn PagedCatalog,
        eligible: &[ArtworkCandidate],
    ) -> Option<ResolvedArtwork> {
        let order = self.draw(|r| r.permutation(eligible.len()));

        for index in order {
            let candidate = &eligible[index];
            let artwork = match catalog.resolve(candidate) {
                Ok(artwork) => artwork,
                Err(e) => {
                    debug!("Cannot resolve artwork {}: {}", candidate.identifier, e);
                    continue;
                }
            };

            match self.transport.probe(&artwork.image_url).await {
                Ok(()) => return Some(artwork),
                Err(e) => debug!(
                    "Image unavailable for \"{}\" ({}), trying another...",
                    artwork.title, e
                ),
            }
        }

        None
    }
}
