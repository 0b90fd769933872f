use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for TTL key-value cache backends.
///
/// Implementations must be safe for concurrent use by many in-flight
/// requests. Callers treat every error as a cache miss (fail-open): a cache
/// outage degrades latency, never availability.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Deletes all values matching a glob pattern (e.g. `transactions:u@x.com:*`).
    ///
    /// Only keys of the tracked classes (see [`super::is_tracked_key`]) are
    /// reachable by pattern; the owner segment of the pattern must be
    /// concrete.
    async fn delete_pattern(&self, pattern: &str) -> Result<()>;
}
