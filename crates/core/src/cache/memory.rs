//! In-memory cache backend with LRU eviction.
//!
//! Mirrors the Redis backend's behavior so tests exercise the same contract:
//! tracked keys (transaction lists, summaries, charge filters) are recorded
//! per user to support pattern deletion, and TTL expiry is lazy (checked on
//! read).

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use super::keys::{is_tracked_key, owner_of_key, owner_of_pattern};
use super::patterns::pattern_matches;
use super::traits::Cache;
use super::Result;

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|d| Instant::now() + d),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() > at)
    }
}

/// Thread-safe in-memory cache with TTL support and LRU eviction.
///
/// Used by unit tests and as the fallback backend when no Redis URL is
/// configured.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, Entry>>>,
    /// owner -> set of tracked keys, for pattern deletion without scanning.
    tracking: Arc<RwLock<HashMap<String, HashSet<String>>>>,
}

impl MemoryCache {
    /// Creates a cache bounded to `max_entries` values.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is 0.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).expect("max_entries must be > 0");
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
            tracking: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut store = self.store.write().await;
        match store.get(key) {
            Some(entry) if entry.is_expired() => Ok(None),
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        {
            let mut store = self.store.write().await;
            store.put(key.to_string(), Entry::new(value.to_vec(), ttl));
        }

        if let Some(owner) = owner_of_key(key) {
            let mut tracking = self.tracking.write().await;
            tracking
                .entry(owner.to_string())
                .or_default()
                .insert(key.to_string());
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if is_tracked_key(key) {
            if let Some(owner) = owner_of_key(key) {
                let mut tracking = self.tracking.write().await;
                if let Some(keys) = tracking.get_mut(owner) {
                    keys.remove(key);
                    if keys.is_empty() {
                        tracking.remove(owner);
                    }
                }
            }
        }

        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        let Some(owner) = owner_of_pattern(pattern) else {
            // Untracked pattern: fall back to a full scan of the bounded store.
            let mut store = self.store.write().await;
            let doomed: Vec<String> = store
                .iter()
                .filter(|(key, _)| pattern_matches(pattern, key))
                .map(|(key, _)| key.clone())
                .collect();
            for key in doomed {
                store.pop(&key);
            }
            return Ok(());
        };

        let doomed: Vec<String> = {
            let tracking = self.tracking.read().await;
            tracking
                .get(owner)
                .map(|keys| {
                    keys.iter()
                        .filter(|k| pattern_matches(pattern, k))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        if !doomed.is_empty() {
            {
                let mut store = self.store.write().await;
                for key in &doomed {
                    store.pop(key);
                }
            }
            let mut tracking = self.tracking.write().await;
            if let Some(keys) = tracking.get_mut(owner) {
                for key in &doomed {
                    keys.remove(key);
                }
                if keys.is_empty() {
                    tracking.remove(owner);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::keys::{charges_key, jars_key, summary_key, transactions_key};
    use super::*;

    const OWNER: &str = "john@x.com";
    const OTHER: &str = "jane@y.org";

    #[tokio::test]
    async fn set_get_delete_roundtrip() {
        let cache = MemoryCache::new(16);
        let key = jars_key(OWNER);

        cache.set(&key, b"[1]", None).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"[1]".to_vec()));

        cache.delete(&key).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entries_read_as_misses() {
        let cache = MemoryCache::new(16);
        let key = jars_key(OWNER);

        cache
            .set(&key, b"x", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn pattern_delete_is_scoped_to_one_user() {
        let cache = MemoryCache::new(64);
        let mine = transactions_key(OWNER, 1, 10, None, None, None);
        let mine_page2 = transactions_key(OWNER, 2, 10, None, None, None);
        let theirs = transactions_key(OTHER, 1, 10, None, None, None);

        for key in [&mine, &mine_page2, &theirs] {
            cache.set(key, b"page", None).await.unwrap();
        }

        cache
            .delete_pattern(&format!("transactions:{}:*", OWNER))
            .await
            .unwrap();

        assert!(cache.get(&mine).await.unwrap().is_none());
        assert!(cache.get(&mine_page2).await.unwrap().is_none());
        assert!(cache.get(&theirs).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn pattern_delete_leaves_other_classes_alone() {
        let cache = MemoryCache::new(64);
        let summary = summary_key(OWNER, 7, 2026);
        let charges = charges_key(OWNER, "Due");

        cache.set(&summary, b"s", None).await.unwrap();
        cache.set(&charges, b"c", None).await.unwrap();

        cache
            .delete_pattern(&format!("summary:{}:*", OWNER))
            .await
            .unwrap();

        assert!(cache.get(&summary).await.unwrap().is_none());
        assert!(cache.get(&charges).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn lru_eviction_respects_capacity() {
        let cache = MemoryCache::new(2);
        cache.set("jars:a", b"1", None).await.unwrap();
        cache.set("jars:b", b"2", None).await.unwrap();
        cache.set("jars:c", b"3", None).await.unwrap();

        // Oldest entry was evicted.
        assert!(cache.get("jars:a").await.unwrap().is_none());
        assert!(cache.get("jars:c").await.unwrap().is_some());
    }
}
