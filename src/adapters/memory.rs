use crate::domain::ports::{CacheItem, CacheStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-process cache store. Expired items read as absent.
#[derive(Clone, Default)]
pub struct MemoryCacheStore {
    items: Arc<Mutex<HashMap<String, CacheItem>>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.items.lock().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get_item(&self, key: &str) -> Result<Option<CacheItem>> {
        let mut items = self.items.lock().await;
        let expired = items
            .get(key)
            .is_some_and(|item| item.ttl <= Utc::now().timestamp());
        if expired {
            items.remove(key);
            return Ok(None);
        }
        Ok(items.get(key).cloned())
    }

    async fn put_item(&self, key: &str, item: CacheItem) -> Result<()> {
        self.items.lock().await.insert(key.to_string(), item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(ttl: i64) -> CacheItem {
        CacheItem {
            payload: "{}".to_string(),
            ttl,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = MemoryCacheStore::new();
        let ttl = Utc::now().timestamp() + 60;
        store.put_item("k", item(ttl)).await.unwrap();
        let mut second = item(ttl);
        second.payload = "{\"v\":2}".to_string();
        store.put_item("k", second.clone()).await.unwrap();

        assert_eq!(store.get_item("k").await.unwrap(), Some(second));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_expired_item_is_evicted_on_read() {
        let store = MemoryCacheStore::new();
        store
            .put_item("k", item(Utc::now().timestamp() - 5))
            .await
            .unwrap();
        assert_eq!(store.get_item("k").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_clones_share_items() {
        let store = MemoryCacheStore::new();
        let clone = store.clone();
        tokio_test::block_on(async {
            clone
                .put_item("k", item(Utc::now().timestamp() + 60))
                .await
                .unwrap();
            assert!(store.contains("k").await);
            assert!(!store.contains("other").await);
        });
    }
}
