use serde::{Deserialize, Serialize};

use crate::acquisition::AcquisitionConfig;
use crate::catalog::{ArticConfig, MetConfig, ARTIC_SOURCE_ID, MET_SOURCE_ID};
use crate::selector::SelectionConfig;
use crate::storage::StorageConfig;
use crate::transport::TransportConfig;

/// Ids of the catalog sources built into the registry.
pub const BUILTIN_SOURCES: [&str; 2] = [MET_SOURCE_ID, ARTIC_SOURCE_ID];

/// Root configuration. Every section has defaults, so an empty file is valid.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
}

/// Catalog source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourcesConfig {
    /// Source active at startup when no choice has been persisted.
    #[serde(default = "default_source")]
    pub default_source: String,
    #[serde(default)]
    pub met: MetConfig,
    #[serde(default)]
    pub artic: ArticConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            default_source: default_source(),
            met: MetConfig::default(),
            artic: ArticConfig::default(),
        }
    }
}

fn default_source() -> String {
    MET_SOURCE_ID.to_string()
}
