//! Image transport configuration.

use serde::{Deserialize, Serialize};

/// HTTP settings shared by the image transport and the catalog clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum number of redirects followed for a single download.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,
}

fn default_user_agent() -> String {
    "FineArtWallpaper/1.0".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_redirects() -> u32 {
    10
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransportConfig::default();
        assert_eq!(config.user_agent, "FineArtWallpaper/1.0");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_redirects, 10);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TransportConfig = toml::from_str("max_redirects = 3").unwrap();
        assert_eq!(config.max_redirects, 3);
        assert_eq!(config.timeout_secs, 30);
    }
}
