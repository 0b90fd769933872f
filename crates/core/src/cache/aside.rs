//! Cache-aside read path.
//!
//! One helper used by every list/detail read: check the cache, fall back to
//! the store on miss, populate with the entity class's TTL. Cache failures
//! are logged and treated as misses (fail-open) — an unreachable cache slows
//! reads down, it never fails them.

use std::time::Duration;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::serialization::{from_cache_bytes, to_cache_bytes};
use super::traits::Cache;
use crate::errors::Result;

/// Serves `key` from `cache` when present, otherwise runs `load` against the
/// authoritative store and populates the cache with `ttl`.
///
/// A cached value that no longer deserializes (e.g. after a model change) is
/// discarded and reloaded.
pub async fn read_through<T, F>(cache: &dyn Cache, key: &str, ttl: Duration, load: F) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Result<T>,
{
    match cache.get(key).await {
        Ok(Some(bytes)) => match from_cache_bytes::<T>(&bytes) {
            Ok(value) => return Ok(value),
            Err(e) => warn!("discarding unreadable cache entry {}: {}", key, e),
        },
        Ok(None) => {}
        Err(e) => warn!("cache read failed for {}: {}", key, e),
    }

    let value = load()?;

    match to_cache_bytes(&value) {
        Ok(bytes) => {
            if let Err(e) = cache.set(key, &bytes, Some(ttl)).await {
                warn!("cache write failed for {}: {}", key, e);
            }
        }
        Err(e) => warn!("failed to serialize cache entry {}: {}", key, e),
    }

    Ok(value)
}
