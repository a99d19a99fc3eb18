//! Acquisition configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outer retry and archive rotation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Retries after the first failed attempt.
    /// Retry `i` waits `i * retry_delay_ms` (linear backoff).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay (milliseconds).
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// Archival copies kept after each promotion.
    #[serde(default = "default_keep_archives")]
    pub keep_archives: usize,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    2000
}

fn default_keep_archives() -> usize {
    5
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay(),
            keep_archives: default_keep_archives(),
        }
    }
}

impl AcquisitionConfig {
    /// Delay before retry number `retry` (1-based).
    pub fn retry_delay(&self, retry: u32) -> Duration {
        Duration::from_millis(self.retry_delay_ms.saturating_mul(retry.into()))
    }
}
