//! Storage configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the storage directory under the user's home.
pub const STORAGE_DIR_NAME: &str = ".fineartwallpaper";

/// Where images, metadata and settings are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

fn default_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STORAGE_DIR_NAME)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dir() {
        let config = StorageConfig::default();
        assert!(config.dir.ends_with(STORAGE_DIR_NAME));
    }

    #[test]
    fn test_deserialize() {
        let config: StorageConfig = toml::from_str(r#"dir = "/tmp/easel""#).unwrap();
        assert_eq!(config.dir, PathBuf::from("/tmp/easel"));
    }
}
