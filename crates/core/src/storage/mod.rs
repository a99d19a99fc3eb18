//! On-disk persistence.
//!
//! One storage directory holds:
//! - `current-wallpaper.jpg`, the current image
//! - `metadata.json`, its title and author
//! - `settings.json`, user settings
//! - `wallpaper-<millis>.jpg`, a bounded set of archival copies
//!
//! Every record is replaced by writing a temp file in the same directory and
//! renaming it over the target.

mod config;
mod error;
mod fs_store;
mod settings;
mod types;

pub use config::{StorageConfig, STORAGE_DIR_NAME};
pub use error::StorageError;
pub use fs_store::{FsImageStore, CURRENT_IMAGE_FILE, METADATA_FILE};
pub use settings::{JsonSettingsStore, Settings, SettingsError, SettingsStore, SETTINGS_FILE};
pub use types::{ImageMetadata, StoredImage, FALLBACK_AUTHOR, FALLBACK_TITLE};
