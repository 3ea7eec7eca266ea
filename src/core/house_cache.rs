use crate::domain::model::HouseCacheEntry;
use crate::domain::ports::{CacheItem, CacheStore};
use chrono::{Duration, Utc};
use std::sync::Arc;

pub const DEFAULT_KEY_PREFIX: &str = "HOUSES#";
pub const DEFAULT_TTL_DAYS: i64 = 30;
pub const DEFAULT_STORE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Best-effort cache of house computations.
///
/// Reads that fail for any reason are misses and writes that fail are only
/// logged, so a broken store never changes the chart, only its cost. Every
/// store call is bounded by `store_timeout`; a read that runs over is a miss
/// and a write that runs over is dropped.
#[derive(Clone)]
pub struct HouseCache {
    store: Arc<dyn CacheStore>,
    key_prefix: String,
    ttl: Duration,
    store_timeout: std::time::Duration,
}

impl HouseCache {
    pub fn new(store: Arc<dyn CacheStore>, key_prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
            ttl,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: std::time::Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn with_defaults(store: Arc<dyn CacheStore>) -> Self {
        Self::new(store, DEFAULT_KEY_PREFIX, Duration::days(DEFAULT_TTL_DAYS))
    }

    /// Expiry, in epoch seconds, for an entry created now.
    pub fn expiry_from_now(&self) -> i64 {
        (Utc::now() + self.ttl).timestamp()
    }

    fn store_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    pub async fn get(&self, key: &str) -> Option<HouseCacheEntry> {
        let store_key = self.store_key(key);
        let read = tokio::time::timeout(self.store_timeout, self.store.get_item(&store_key));
        let item = match read.await {
            Ok(Ok(Some(item))) => item,
            Ok(Ok(None)) => {
                tracing::debug!("House cache miss for {}", store_key);
                return None;
            }
            Ok(Err(e)) => {
                tracing::warn!("House cache read failed for {}: {}", store_key, e);
                return None;
            }
            Err(_) => {
                tracing::warn!(
                    "House cache read for {} timed out after {:?}",
                    store_key,
                    self.store_timeout
                );
                return None;
            }
        };

        let now = Utc::now();
        if item.ttl <= now.timestamp() {
            tracing::debug!("House cache entry {} expired at {}", store_key, item.ttl);
            return None;
        }

        match serde_json::from_str::<HouseCacheEntry>(&item.payload) {
            Ok(entry) if !entry.is_expired(now) => {
                tracing::debug!("House cache hit for {}", store_key);
                Some(entry)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Discarding undecodable house cache entry {}: {}", store_key, e);
                None
            }
        }
    }

    pub async fn put(&self, key: &str, entry: &HouseCacheEntry) {
        let store_key = self.store_key(key);
        let payload = match serde_json::to_string(entry) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Could not encode house cache entry {}: {}", store_key, e);
                return;
            }
        };

        let item = CacheItem {
            payload,
            ttl: entry.ttl,
            created_at: entry.created_at.to_rfc3339(),
        };

        let write = tokio::time::timeout(self.store_timeout, self.store.put_item(&store_key, item));
        match write.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("House cache write failed for {}: {}", store_key, e),
            Err(_) => tracing::warn!(
                "House cache write for {} timed out after {:?}",
                store_key,
                self.store_timeout
            ),
        }
    }
}
