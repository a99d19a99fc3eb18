//! Background setter contract.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a background setter.
#[derive(Debug, Error)]
pub enum WallpaperError {
    /// The image to apply does not exist.
    #[error("Image file not found: {0}")]
    FileNotFound(String),

    /// No setter is available for the running platform.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The platform command failed.
    #[error("Failed to set wallpaper on {platform}: {message}")]
    CommandFailed { platform: String, message: String },
}

/// Applies an image file as the desktop background.
#[async_trait]
pub trait BackgroundSetter: Send + Sync {
    /// Platform identifier this setter targets (e.g. "linux", "macos").
    fn platform(&self) -> &str;

    /// Apply the image at `image_path`. The path is absolute and references
    /// an existing file at call time.
    async fn set_wallpaper(&self, image_path: &Path) -> Result<(), WallpaperError>;
}
