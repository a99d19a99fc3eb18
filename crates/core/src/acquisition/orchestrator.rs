//! Acquisition orchestrator implementation.
//!
//! Drives one acquisition end to end:
//! registry (active source) -> selector -> transport -> image store.
//! A failed selection or download restarts the whole sequence with linear
//! backoff. Only one acquisition may hold the current-image slot at a time.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::catalog::{CatalogSource, SourceDescriptor};
use crate::registry::SourceRegistry;
use crate::selector::CandidateSelector;
use crate::storage::{FsImageStore, Settings, SettingsStore, StoredImage};
use crate::surface::{DisplayImage, PresentationSurface, SurfaceEvent};
use crate::transport::ImageTransport;
use crate::wallpaper::{BackgroundSetter, WallpaperError};

use super::config::AcquisitionConfig;
use super::types::{AcquisitionError, AcquisitionState};

/// A stored image plus its size, as produced by one attempt.
struct Acquired {
    stored: StoredImage,
    size_bytes: u64,
}

impl Acquired {
    fn display(&self) -> DisplayImage {
        DisplayImage {
            path: self.stored.file_path.clone(),
            title: self.stored.title.clone(),
            author: self.stored.author.clone(),
            size_bytes: self.size_bytes,
        }
    }
}

/// Coordinates acquisition, promotion and source selection.
pub struct AcquisitionOrchestrator {
    config: AcquisitionConfig,
    registry: Arc<SourceRegistry>,
    selector: CandidateSelector,
    transport: Arc<dyn ImageTransport>,
    store: FsImageStore,
    settings: Arc<dyn SettingsStore>,
    surface: Arc<dyn PresentationSurface>,

    // Runtime state
    state: Mutex<AcquisitionState>,
    slot: AsyncMutex<()>,
}

impl AcquisitionOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        config: AcquisitionConfig,
        registry: Arc<SourceRegistry>,
        selector: CandidateSelector,
        transport: Arc<dyn ImageTransport>,
        store: FsImageStore,
        settings: Arc<dyn SettingsStore>,
        surface: Arc<dyn PresentationSurface>,
    ) -> Self {
        Self {
            config,
            registry,
            selector,
            transport,
            store,
            settings,
            surface,
            state: Mutex::new(AcquisitionState::Idle),
            slot: AsyncMutex::new(()),
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn store(&self) -> &FsImageStore {
        &self.store
    }

    /// State of the most recent acquisition.
    pub fn state(&self) -> AcquisitionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: AcquisitionState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    fn claim_slot(&self) -> Result<MutexGuard<'_, ()>, AcquisitionError> {
        self.slot.try_lock().map_err(|_| AcquisitionError::InProgress)
    }

    /// Fetch and store one new image, retrying failed attempts.
    pub async fn acquire_one(&self) -> Result<StoredImage, AcquisitionError> {
        let _slot = self.claim_slot()?;
        self.acquire_with_retry().await.map(|acquired| acquired.stored)
    }

    /// Fetch a new image and report progress to the surface.
    ///
    /// Emits `Loading(true)`, then `ImageReady` or `Error`, then
    /// `Loading(false)`. A call made while another fetch is running returns
    /// [`AcquisitionError::InProgress`] without emitting anything.
    pub async fn refresh(&self) -> Result<StoredImage, AcquisitionError> {
        let _slot = self.claim_slot()?;

        self.surface.notify(SurfaceEvent::Loading(true));
        let result = self.acquire_with_retry().await;
        match &result {
            Ok(acquired) => self.surface.notify(SurfaceEvent::ImageReady(acquired.display())),
            Err(e) => self.surface.notify(SurfaceEvent::Error(e.to_string())),
        }
        self.surface.notify(SurfaceEvent::Loading(false));

        result.map(|acquired| acquired.stored)
    }

    /// Show the stored current image, or fetch one when none exists.
    pub async fn load_initial(&self) -> Result<StoredImage, AcquisitionError> {
        match self.store.load_current().await {
            Ok(Some((stored, bytes))) => {
                info!("Showing stored image \"{}\" by {}", stored.title, stored.author);
                let acquired = Acquired {
                    stored,
                    size_bytes: bytes.len() as u64,
                };
                self.surface.notify(SurfaceEvent::ImageReady(acquired.display()));
                Ok(acquired.stored)
            }
            Ok(None) => {
                debug!("No stored image, fetching a new one");
                self.refresh().await
            }
            Err(e) => {
                warn!("Failed to load stored image: {}", e);
                self.refresh().await
            }
        }
    }

    async fn acquire_with_retry(&self) -> Result<Acquired, AcquisitionError> {
        self.set_state(AcquisitionState::Fetching);
        let attempts = self.config.max_retries + 1;
        let mut attempt = 1;

        loop {
            match self.attempt().await {
                Ok(acquired) => {
                    self.set_state(AcquisitionState::Succeeded);
                    return Ok(acquired);
                }
                Err(e) if e.is_retryable() && attempt < attempts => {
                    let delay = self.config.retry_delay(attempt);
                    warn!(
                        "Attempt {}/{} failed: {}, retrying in {:?}",
                        attempt, attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) if e.is_retryable() => {
                    error!("Failed to fetch artwork after {} attempts: {}", attempts, e);
                    self.set_state(AcquisitionState::Failed);
                    return Err(AcquisitionError::RetriesExhausted {
                        attempts,
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    error!("Failed to fetch artwork: {}", e);
                    self.set_state(AcquisitionState::Failed);
                    return Err(e);
                }
            }
        }
    }

    async fn attempt(&self) -> Result<Acquired, AcquisitionError> {
        let (descriptor, source) = self.registry.active()?;
        debug!("Selecting from {} ({})", descriptor.display_name, source.kind());

        let artwork = self
            .selector
            .select_random_eligible(&descriptor.id, &source)
            .await?;
        let bytes = self.transport.download(&artwork.image_url).await?;
        let stored = self
            .store
            .save_current(&bytes, &artwork, &descriptor.id)
            .await?;

        Ok(Acquired {
            stored,
            size_bytes: bytes.len() as u64,
        })
    }

    /// Promote the current image to desktop background.
    ///
    /// The image is copied to a fresh archival name first, so setters that
    /// cache by file name still refresh, and old archives are pruned.
    pub async fn set_wallpaper(
        &self,
        setter: &dyn BackgroundSetter,
    ) -> Result<PathBuf, AcquisitionError> {
        if self.store.current().await.is_none() {
            let err = AcquisitionError::NoImageLoaded;
            self.surface.notify(SurfaceEvent::Error(err.to_string()));
            return Err(err);
        }

        self.surface.notify(SurfaceEvent::SettingWallpaper(true));
        let result = self.promote(setter).await;
        match &result {
            Ok(path) => {
                info!("Wallpaper set on {} from {}", setter.platform(), path.display());
                self.surface.notify(SurfaceEvent::WallpaperSet(true));
            }
            Err(e) => {
                error!("Failed to set wallpaper: {}", e);
                self.surface.notify(SurfaceEvent::Error(e.to_string()));
            }
        }
        self.surface.notify(SurfaceEvent::SettingWallpaper(false));

        result
    }

    async fn promote(&self, setter: &dyn BackgroundSetter) -> Result<PathBuf, AcquisitionError> {
        let archive = self.store.archive_current().await?;

        if let Err(e) = self.store.prune_archives(self.config.keep_archives).await {
            warn!("Failed to prune archives: {}", e);
        }

        let absolute = tokio::fs::canonicalize(&archive)
            .await
            .map_err(|_| WallpaperError::FileNotFound(archive.display().to_string()))?;

        setter.set_wallpaper(&absolute).await?;
        Ok(absolute)
    }

    /// Register a catalog source. Replacing an already registered id drops the
    /// identifiers cached from its previous client.
    pub async fn register_source(&self, descriptor: SourceDescriptor, source: CatalogSource) {
        let id = descriptor.id.clone();
        if self.registry.register(descriptor, source) {
            self.selector.forget_source(&id).await;
        }
    }

    /// Switch the active source and persist the choice.
    pub async fn select_source(&self, id: &str) -> Result<(), AcquisitionError> {
        self.registry.set_active(id)?;
        self.settings.set(&Settings::with_source(id)).await?;
        Ok(())
    }

    /// Apply the persisted source choice, if any. Returns the applied id.
    ///
    /// A persisted id that is no longer registered is ignored.
    pub async fn restore_source(&self) -> Option<String> {
        let id = self.settings.get().await.source_id?;

        match self.registry.set_active(&id) {
            Ok(()) => {
                debug!("Restored source {}", id);
                Some(id)
            }
            Err(e) => {
                warn!("Ignoring saved source: {}", e);
                None
            }
        }
    }
}
