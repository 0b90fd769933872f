//! JSON encoding of domain values for cache storage.
//!
//! Cached values are stored as JSON so they are easy to inspect in Redis.
//! Deserialization failures are surfaced as [`CacheError::Serialization`];
//! callers treat them as a miss and repopulate from the store, which makes
//! stale cache shapes self-healing across deployments.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CacheError, Result};

/// Serializes a value to JSON bytes for cache storage.
pub fn to_cache_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// Deserializes JSON bytes from the cache.
pub fn from_cache_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| CacheError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jars::Jar;
    use chrono::NaiveDate;

    fn sample_jar() -> Jar {
        let ts = NaiveDate::from_ymd_opt(2026, 7, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Jar {
            id: "jar-1".to_string(),
            user_id: "user-1".to_string(),
            jar_name: "Trip".to_string(),
            goal_amount: 1000.0,
            amount_saved: 200.0,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn roundtrips_a_jar_list() {
        let jars = vec![sample_jar()];
        let bytes = to_cache_bytes(&jars).unwrap();
        let back: Vec<Jar> = from_cache_bytes(&bytes).unwrap();
        assert_eq!(back, jars);
    }

    #[test]
    fn cached_json_uses_camel_case() {
        let bytes = to_cache_bytes(&sample_jar()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"jarName\""));
        assert!(text.contains("\"amountSaved\""));
    }

    #[test]
    fn malformed_bytes_are_a_serialization_error() {
        let result: Result<Vec<Jar>> = from_cache_bytes(b"not json");
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }
}
