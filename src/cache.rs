//! Result cache stores.
//!
//! Defines the [`CacheStore`] trait and concrete implementations:
//! - **[`MemoryCache`]** — in-process map with per-entry time-to-live.
//! - **[`DisabledCache`]** — always misses; used when caching is turned off.
//!
//! Stores hold serialized result bytes under flat string keys. Expiry is the
//! store's responsibility: an expired entry reads back as absent. Store
//! failures map to [`RecError::CacheUnavailable`], which the engine treats
//! as non-fatal.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::CacheConfig;
use crate::error::RecError;

/// Trait for cache stores.
///
/// Get/put are atomic with respect to one key; no read-modify-write is ever
/// needed by the engine.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch the bytes stored under `key`, or `None` on a miss or an
    /// expired entry.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, RecError>;

    /// Store `value` under `key` for at most `ttl`.
    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), RecError>;
}

// ============ Memory cache ============

/// In-process cache store with per-entry TTL.
///
/// Entries past their deadline are treated as absent and dropped on read.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Vec<u8>, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries, counting any not yet swept.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, RecError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| RecError::CacheUnavailable("cache lock poisoned".to_string()))?;

        match entries.get(key) {
            Some((value, deadline)) if *deadline > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), RecError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| RecError::CacheUnavailable("cache lock poisoned".to_string()))?;

        // Sweep dead entries on write so keys that are never re-read do not
        // accumulate across distinct queries.
        let now = Instant::now();
        entries.retain(|_, (_, deadline)| *deadline > now);

        entries.insert(key.to_string(), (value, now + ttl));
        Ok(())
    }
}

// ============ Disabled cache ============

/// A no-op cache store: every get misses, every put is dropped.
pub struct DisabledCache;

#[async_trait]
impl CacheStore for DisabledCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, RecError> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), RecError> {
        Ok(())
    }
}

/// Create the appropriate [`CacheStore`] based on configuration.
pub fn create_store(config: &CacheConfig) -> anyhow::Result<Box<dyn CacheStore>> {
    match config.provider.as_str() {
        "memory" => Ok(Box::new(MemoryCache::new())),
        "disabled" => Ok(Box::new(DisabledCache)),
        other => anyhow::bail!("Unknown cache provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_before_expiry_hits() {
        let cache = MemoryCache::new();
        cache
            .put("k", b"value".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        let hit = cache.get("k").await.unwrap();
        assert_eq!(hit, Some(b"value".to_vec()));
    }

    #[tokio::test]
    async fn test_get_after_expiry_misses() {
        let cache = MemoryCache::new();
        cache
            .put("k", b"value".to_vec(), Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let cache = MemoryCache::new();
        cache
            .put("k", b"old".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .put("k", b"new".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_put_sweeps_expired_entries() {
        let cache = MemoryCache::new();
        cache
            .put("short", b"a".to_vec(), Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        // Writing an unrelated key drops the dead one from the map.
        cache
            .put("other", b"b".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("short").await.unwrap(), None);
        assert_eq!(cache.get("other").await.unwrap(), Some(b"b".to_vec()));
    }

    #[tokio::test]
    async fn test_missing_key_misses() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_disabled_cache_never_stores() {
        let cache = DisabledCache;
        cache
            .put("k", b"value".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[test]
    fn test_create_store_rejects_unknown_provider() {
        let config = CacheConfig {
            provider: "redis".to_string(),
            ..CacheConfig::default()
        };
        assert!(create_store(&config).is_err());
    }
}
