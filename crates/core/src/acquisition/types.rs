//! Types for the acquisition orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::RegistryError;
use crate::selector::SelectionError;
use crate::storage::{SettingsError, StorageError};
use crate::transport::TransportError;
use crate::wallpaper::WallpaperError;

/// Message reported when promoting without a current image.
pub const NO_IMAGE_LOADED: &str = "No image loaded";

/// Errors that can occur during acquisition and promotion.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// Every attempt failed. Displays the final cause verbatim.
    #[error("{message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// Another acquisition holds the current-image slot.
    #[error("an image fetch is already in progress")]
    InProgress,

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("{}", NO_IMAGE_LOADED)]
    NoImageLoaded,

    #[error(transparent)]
    Wallpaper(#[from] WallpaperError),
}

impl AcquisitionError {
    /// Whether the outer retry loop should try again after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Selection(_) | Self::Transport(_))
    }
}

/// State of the most recent acquisition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionState {
    #[default]
    Idle,
    Fetching,
    Succeeded,
    Failed,
}

impl std::fmt::Display for AcquisitionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
