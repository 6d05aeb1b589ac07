use std::time::Duration;

/// Why a cache operation did not complete.
///
/// These never reach an HTTP caller; [`crate::NamespaceCache`] logs them and
/// degrades to a miss or a skipped write.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis command failed: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Redis connection pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("Failed to create Redis pool: {0}")]
    CreatePool(#[from] deadpool_redis::CreatePoolError),

    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),
}
