//! Redis cache backend for Moneta.
//!
//! Implements the `Cache` trait from `moneta-core` against Redis, with
//! set-based key tracking for pattern deletion: every tracked key
//! (transaction lists, summaries, charge status filters) is recorded in its
//! owner's tracking set, so purging `transactions:{owner}:*` reads one set
//! instead of scanning the keyspace.
//!
//! # Non-atomicity
//!
//! `set`, `delete`, and `delete_pattern` issue multiple commands without a
//! transaction. That is safe here: SREM of an absent member and DEL of an
//! absent key are no-ops, so a crash between commands leaves at worst a
//! stale tracking-set member or an already-counted-down key, both of which
//! later calls clean up. The worst case is temporary staleness, never a
//! wrong value.

mod error;

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use error::map_redis_error;
use moneta_core::cache::{
    owner_of_key, owner_of_pattern, pattern_matches, tracking_key, Cache, Result,
};

/// Redis cache backend using a connection manager for pooling/reconnects.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis at `url` (e.g. `redis://localhost:6379`).
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();

        match ttl {
            Some(duration) => {
                let seconds = duration.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, seconds)
                    .await
                    .map_err(map_redis_error)?;
            }
            None => {
                conn.set::<_, _, ()>(key, value)
                    .await
                    .map_err(map_redis_error)?;
            }
        }

        if let Some(owner) = owner_of_key(key) {
            conn.sadd::<_, _, ()>(tracking_key(owner), key)
                .await
                .map_err(map_redis_error)?;
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();

        if let Some(owner) = owner_of_key(key) {
            conn.srem::<_, _, ()>(tracking_key(owner), key)
                .await
                .map_err(map_redis_error)?;
        }

        conn.del::<_, ()>(key).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        // Patterns are always owner-scoped; anything else is a no-op rather
        // than an excuse to SCAN.
        let Some(owner) = owner_of_pattern(pattern) else {
            return Ok(());
        };

        let mut conn = self.conn.clone();
        let tracking = tracking_key(owner);
        let tracked: Vec<String> = conn.smembers(&tracking).await.map_err(map_redis_error)?;

        let doomed: Vec<&String> = tracked
            .iter()
            .filter(|k| pattern_matches(pattern, k))
            .collect();
        if doomed.is_empty() {
            return Ok(());
        }

        conn.del::<_, ()>(&doomed).await.map_err(map_redis_error)?;
        conn.srem::<_, _, ()>(&tracking, &doomed)
            .await
            .map_err(map_redis_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moneta_core::cache::{charges_key, jars_key, transactions_key, transactions_pattern};
    use uuid::Uuid;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// Skip the test when no Redis is reachable.
    async fn get_test_cache() -> Option<RedisCache> {
        RedisCache::new(&redis_url()).await.ok()
    }

    /// Unique per-test owner so runs never interfere.
    fn test_owner() -> String {
        format!("{}@test.local", Uuid::new_v4())
    }

    #[tokio::test]
    async fn set_get_roundtrip_with_ttl() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };
        let owner = test_owner();
        let key = jars_key(&owner);

        cache
            .set(&key, b"[1,2]", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"[1,2]".to_vec()));

        cache.delete(&key).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn entries_expire() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };
        let owner = test_owner();
        let key = jars_key(&owner);

        cache
            .set(&key, b"x", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn pattern_delete_uses_the_tracking_set() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };
        let owner = test_owner();
        let page1 = transactions_key(&owner, 1, 10, None, None, None);
        let page2 = transactions_key(&owner, 2, 10, None, None, None);
        let charges = charges_key(&owner, "Due");

        for key in [&page1, &page2, &charges] {
            cache.set(key, b"v", None).await.unwrap();
        }

        cache
            .delete_pattern(&transactions_pattern(&owner))
            .await
            .unwrap();

        assert!(cache.get(&page1).await.unwrap().is_none());
        assert!(cache.get(&page2).await.unwrap().is_none());
        // Different class for the same owner survives.
        assert!(cache.get(&charges).await.unwrap().is_some());

        // Cleanup.
        cache.delete(&charges).await.unwrap();
        let mut conn = cache.conn.clone();
        let _: () = redis::AsyncCommands::del(&mut conn, tracking_key(&owner))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unscoped_patterns_are_a_noop() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };
        let owner = test_owner();
        let key = jars_key(&owner);
        cache.set(&key, b"v", None).await.unwrap();

        cache.delete_pattern("jars:*").await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        cache.delete(&key).await.unwrap();
    }
}
