//! Time-boxed cache of catalog identifier lists.
//!
//! Holds at most one entry per source. An entry is served while it is younger
//! than the TTL; after that it is dropped and the list refetched on next use.
//! Concurrent refreshes are not coalesced: last writer wins.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

/// Default time-to-live for cached identifier lists.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// One cached identifier list.
#[derive(Debug, Clone)]
pub struct CatalogCacheEntry {
    pub source_id: String,
    pub identifiers: Arc<Vec<String>>,
    pub fetched_at: Instant,
}

impl CatalogCacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Per-source identifier list cache.
#[derive(Debug)]
pub struct CatalogCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CatalogCacheEntry>>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached list for `source_id` if still fresh, otherwise run
    /// `fetch`, store its result with a new timestamp and return it.
    ///
    /// A failed fetch leaves the cache without an entry for the source.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        source_id: &str,
        fetch: F,
    ) -> Result<Arc<Vec<String>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>, E>>,
    {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(source_id) {
                if entry.is_fresh(self.ttl) {
                    debug!(
                        "Catalog cache hit for {} ({} identifiers)",
                        source_id,
                        entry.identifiers.len()
                    );
                    return Ok(Arc::clone(&entry.identifiers));
                }
            }
        }

        // Expired entries are discarded before refetching.
        self.entries.write().await.remove(source_id);

        let identifiers = Arc::new(fetch().await?);
        info!(
            "Cached {} identifiers for source {}",
            identifiers.len(),
            source_id
        );

        self.entries.write().await.insert(
            source_id.to_string(),
            CatalogCacheEntry {
                source_id: source_id.to_string(),
                identifiers: Arc::clone(&identifiers),
                fetched_at: Instant::now(),
            },
        );

        Ok(identifiers)
    }

    /// Current entry for a source, fresh or not.
    pub async fn entry(&self, source_id: &str) -> Option<CatalogCacheEntry> {
        self.entries.read().await.get(source_id).cloned()
    }

    /// Drop the entry for a source.
    pub async fn invalidate(&self, source_id: &str) {
        self.entries.write().await.remove(source_id);
    }
}
