use crate::domain::ports::{CacheItem, CacheStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Cache store that keeps one JSON file per key under a base directory.
#[derive(Debug, Clone)]
pub struct LocalCacheStore {
    base_path: PathBuf,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredFile {
    key: String,
    payload: String,
    ttl: i64,
    created_at: String,
}

impl LocalCacheStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    // 鍵可能含有 '#'，檔名改用雜湊
    fn file_path(&self, key: &str) -> PathBuf {
        let digest = hex::encode(Sha256::digest(key.as_bytes()));
        self.base_path.join(format!("{}.json", digest))
    }
}

#[async_trait]
impl CacheStore for LocalCacheStore {
    async fn get_item(&self, key: &str) -> Result<Option<CacheItem>> {
        let full_path = self.file_path(key);
        let data = match tokio::fs::read(&full_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredFile = serde_json::from_slice(&data)?;
        if stored.key != key {
            return Ok(None);
        }

        if stored.ttl <= chrono::Utc::now().timestamp() {
            // 過期檔案順手刪除，失敗也無妨
            let _ = tokio::fs::remove_file(&full_path).await;
            return Ok(None);
        }

        Ok(Some(CacheItem {
            payload: stored.payload,
            ttl: stored.ttl,
            created_at: stored.created_at,
        }))
    }

    async fn put_item(&self, key: &str, item: CacheItem) -> Result<()> {
        let full_path = self.file_path(key);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let stored = StoredFile {
            key: key.to_string(),
            payload: item.payload,
            ttl: item.ttl,
            created_at: item.created_at,
        };
        tokio::fs::write(full_path, serde_json::to_vec_pretty(&stored)?).await?;
        Ok(())
    }
}
