use moneta_core::cache::CacheError;

/// Maps a Redis error onto the backend-agnostic cache error type.
pub(crate) fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal() || err.is_connection_dropped() || err.is_timeout() {
        CacheError::ConnectionFailed(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}
