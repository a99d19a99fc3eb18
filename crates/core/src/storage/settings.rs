//! Persisted user settings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::warn;

use super::error::StorageError;
use super::fs_store::{ensure_dir, write_atomic};

/// File name of the settings record.
pub const SETTINGS_FILE: &str = "settings.json";

/// Errors from a settings store.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to encode settings: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to persist settings: {0}")]
    Storage(#[from] StorageError),
}

/// User settings. Every field is optional; `set` only touches fields that are
/// present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl Settings {
    pub fn with_source(source_id: impl Into<String>) -> Self {
        Self {
            source_id: Some(source_id.into()),
        }
    }
}

/// Persists and retrieves [`Settings`].
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current settings. Missing or unreadable records read as empty.
    async fn get(&self) -> Settings;

    /// Merge `partial` into the persisted settings.
    async fn set(&self, partial: &Settings) -> Result<(), SettingsError>;
}

/// Settings kept as a JSON object on disk.
///
/// Unknown keys in the file are preserved across writes.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `settings.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_object(&self) -> Map<String, Value> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(_) => return Map::new(),
        };

        match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!("Ignoring unreadable settings at {}", self.path.display());
                Map::new()
            }
        }
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn get(&self) -> Settings {
        serde_json::from_value(Value::Object(self.read_object().await)).unwrap_or_default()
    }

    async fn set(&self, partial: &Settings) -> Result<(), SettingsError> {
        let mut merged = self.read_object().await;
        if let Value::Object(update) = serde_json::to_value(partial)? {
            merged.extend(update);
        }

        if let Some(dir) = self.path.parent() {
            ensure_dir(dir).await?;
        }
        write_atomic(&self.path, &serde_json::to_vec_pretty(&Value::Object(merged))?).await?;
        Ok(())
    }
}
