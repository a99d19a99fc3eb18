//! Recording presentation surface and mock background setter.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;

use crate::surface::{PresentationSurface, SurfaceEvent};
use crate::wallpaper::{BackgroundSetter, WallpaperError};

/// Surface that records every event for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in order.
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Error messages received so far.
    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl PresentationSurface for RecordingSurface {
    fn notify(&self, event: SurfaceEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Mock implementation of [`BackgroundSetter`].
#[derive(Debug, Clone, Default)]
pub struct MockBackgroundSetter {
    applied: Arc<RwLock<Vec<PathBuf>>>,
    fail: Arc<RwLock<bool>>,
}

impl MockBackgroundSetter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail.
    pub async fn set_failing(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Paths applied so far.
    pub async fn applied(&self) -> Vec<PathBuf> {
        self.applied.read().await.clone()
    }
}

#[async_trait]
impl BackgroundSetter for MockBackgroundSetter {
    fn platform(&self) -> &str {
        "mock"
    }

    async fn set_wallpaper(&self, image_path: &Path) -> Result<(), WallpaperError> {
        if *self.fail.read().await {
            return Err(WallpaperError::CommandFailed {
                platform: "mock".to_string(),
                message: "mock setter failure".to_string(),
            });
        }
        self.applied.write().await.push(image_path.to_path_buf());
        Ok(())
    }
}
