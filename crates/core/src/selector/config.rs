//! Candidate selection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bounds for the random candidate search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Identifier draws per selection on flat-list catalogs.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Highest page number drawn on paged catalogs.
    #[serde(default = "default_max_page")]
    pub max_page: u32,

    /// Page draws per selection on paged catalogs before giving up.
    #[serde(default = "default_max_page_draws")]
    pub max_page_draws: u32,

    /// How long a flat catalog's identifier list stays cached (seconds).
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

fn default_max_attempts() -> u32 {
    10
}

fn default_max_page() -> u32 {
    100
}

fn default_max_page_draws() -> u32 {
    20
}

fn default_cache_ttl() -> u64 {
    60 * 60
}

impl SelectionConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            max_page: default_max_page(),
            max_page_draws: default_max_page_draws(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SelectionConfig::default();
        assert_eq!(config.max_attempts, 10);
        assert_eq!(config.max_page, 100);
        assert_eq!(config.max_page_draws, 20);
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            max_attempts = 4
            max_page = 50
            max_page_draws = 8
            cache_ttl_secs = 600
        "#;
        let config: SelectionConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.max_page, 50);
        assert_eq!(config.max_page_draws, 8);
        assert_eq!(config.cache_ttl_secs, 600);
    }
}
