//! Mock image transport for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::transport::{ImageTransport, TransportError};

/// Mock implementation of [`ImageTransport`].
///
/// Serves registered URLs; anything else answers 404. Download failures can
/// be queued and every download/probe URL is recorded.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    images: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    download_failures: Arc<RwLock<u32>>,
    downloads: Arc<RwLock<Vec<String>>>,
    probes: Arc<RwLock<Vec<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` at `url`.
    pub async fn add_image(&self, url: &str, bytes: Vec<u8>) {
        self.images.write().await.insert(url.to_string(), bytes);
    }

    /// Fail the next `count` downloads with a 503.
    pub async fn fail_next_downloads(&self, count: u32) {
        *self.download_failures.write().await = count;
    }

    /// Downloaded URLs, in call order.
    pub async fn downloads(&self) -> Vec<String> {
        self.downloads.read().await.clone()
    }

    /// Probed URLs, in call order.
    pub async fn probes(&self) -> Vec<String> {
        self.probes.read().await.clone()
    }
}

#[async_trait]
impl ImageTransport for MockTransport {
    async fn download(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.downloads.write().await.push(url.to_string());

        let mut failures = self.download_failures.write().await;
        if *failures > 0 {
            *failures -= 1;
            return Err(TransportError::Status {
                status: 503,
                url: url.to_string(),
            });
        }

        self.images
            .read()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::Status {
                status: 404,
                url: url.to_string(),
            })
    }

    async fn probe(&self, url: &str) -> Result<(), TransportError> {
        self.probes.write().await.push(url.to_string());

        if self.images.read().await.contains_key(url) {
            Ok(())
        } else {
            Err(TransportError::Status {
                status: 404,
                url: url.to_string(),
            })
        }
    }
}
