use fjall::Keyspace;
use serde::Deserialize;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task;

use crate::{DashboardError, Result};

#[derive(Serialize, Deserialize)]
struct StoredEntry<T> {
    value: T,
    expires_at: Option<u64>, // Unix timestamp (seconds), None never expires
}

/// Key-value store on disk used for API responses and dashboard state
#[derive(Clone)]
pub struct PersistentCache {
    store: Keyspace,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

fn unix_now() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| DashboardError::cache(format!("System clock before epoch: {e}")))
}

fn join_error(err: task::JoinError) -> DashboardError {
    DashboardError::cache(format!("Cache task failed: {err}"))
}

impl PersistentCache {
    /// Open (or create) the cache database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(path.as_ref()).open()?;
        let items = db.keyspace("cache", fjall::KeyspaceCreateOptions::default)?;
        Ok(PersistentCache { store: items })
    }

    /// Stores a serializable value with a time-to-live (TTL).
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self))]
    pub async fn put<T: Serialize + Send + Debug + 'static>(
        &self,
        key: &str,
        value: T,
        ttl: Duration,
    ) -> Result<()> {
        let expires_at = unix_now()?
            .checked_add(ttl.as_secs())
            .ok_or_else(|| DashboardError::cache("TTL overflow"))?;
        self.insert(key, StoredEntry {
            value,
            expires_at: Some(expires_at),
        })
        .await
    }

    /// Stores a value that never expires.
    #[tracing::instrument(name = "put_cache_permanent", level = "debug", skip(self))]
    pub async fn put_permanent<T: Serialize + Send + Debug + 'static>(
        &self,
        key: &str,
        value: T,
    ) -> Result<()> {
        self.insert(key, StoredEntry {
            value,
            expires_at: None,
        })
        .await
    }

    async fn insert<T: Serialize>(&self, key: &str, entry: StoredEntry<T>) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let bytes = postcard::to_stdvec(&entry)?;

        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(join_error)??;
        Ok(())
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes: Option<Vec<u8>> =
            task::spawn_blocking(move || get_from_store(store, key_bytes))
                .await
                .map_err(join_error)??;

        if let Some(bytes) = maybe_bytes {
            let entry: StoredEntry<T> = postcard::from_bytes(&bytes)?;
            let fresh = match entry.expires_at {
                Some(expires_at) => unix_now()? < expires_at,
                None => true,
            };

            if fresh {
                tracing::debug!("Key found and still fresh");
                Ok(Some(entry.value))
            } else {
                tracing::debug!("Key found but expired");
                self.remove(key).await?;
                Ok(None)
            }
        } else {
            tracing::debug!("Key not found");
            Ok(None)
        }
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        task::spawn_blocking(move || store.remove(key))
            .await
            .map_err(join_error)??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_and_get() {
        let dir = TempDir::new().unwrap();
        let cache = PersistentCache::open(dir.path()).unwrap();

        cache
            .put("current:40.74:-74.17", vec![1.5_f64, 2.5], Duration::from_secs(600))
            .await
            .unwrap();

        let value: Option<Vec<f64>> = cache.get("current:40.74:-74.17").await.unwrap();
        assert_eq!(value, Some(vec![1.5, 2.5]));

        let missing: Option<Vec<f64>> = cache.get("current:0.00:0.00").await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let dir = TempDir::new().unwrap();
        let cache = PersistentCache::open(dir.path()).unwrap();

        cache
            .put("short", "value".to_string(), Duration::ZERO)
            .await
            .unwrap();

        let value: Option<String> = cache.get("short").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_permanent_entries_and_remove() {
        let dir = TempDir::new().unwrap();
        let cache = PersistentCache::open(dir.path()).unwrap();

        cache
            .put_permanent("favorites", vec!["Paris".to_string()])
            .await
            .unwrap();
        let value: Option<Vec<String>> = cache.get("favorites").await.unwrap();
        assert_eq!(value, Some(vec!["Paris".to_string()]));

        cache.remove("favorites").await.unwrap();
        let value: Option<Vec<String>> = cache.get("favorites").await.unwrap();
        assert_eq!(value, None);
    }
}
