//! Cache abstraction: trait, key builders, glob patterns, and the
//! cross-entity invalidation mapping.
//!
//! Reads are cache-aside (check cache, fall back to the store, populate with
//! a TTL) and writes are delete-on-write: every mutating service method asks
//! [`CacheInvalidator`] to purge the keys listed for its entity class in
//! [`purge_ops`]. The mapping lives in one place so invalidation coverage
//! cannot drift between call sites.
//!
//! Backends implement [`Cache`]: an in-memory implementation lives in this
//! crate (used by tests and as a fallback), the Redis implementation lives in
//! `moneta-cache-redis`.

mod aside;
mod error;
mod invalidation;
mod keys;
mod memory;
mod patterns;
mod serialization;
mod traits;

pub use aside::read_through;
pub use error::{CacheError, Result};
pub use invalidation::{purge_ops, CacheInvalidator, EntityChange, PurgeOp};
pub use keys::{
    charges_key, charges_pattern, goal_key, goals_key, insights_key, is_tracked_key, jars_key,
    owner_of_key, owner_of_pattern, profile_key, summary_key, summary_pattern, tracking_key,
    transactions_key, transactions_pattern,
};
pub use memory::MemoryCache;
pub use patterns::pattern_matches;
pub use serialization::{from_cache_bytes, to_cache_bytes};
pub use traits::Cache;
