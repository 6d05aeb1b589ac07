//! Cache storage: an in-process map or a shared Redis instance.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use deadpool_redis::Pool;
use redis::AsyncCommands;

use crate::config::CacheConfig;
use crate::error::CacheError;

/// Keys fetched per `SCAN` round trip when clearing by prefix.
const SCAN_BATCH: usize = 200;

/// A locally cached value with its expiry.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub data: Arc<Vec<u8>>,
    pub expires_at: Instant,
}

impl CachedEntry {
    pub fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data: Arc::new(data),
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Where cached bytes live.
///
/// - **Local**: a `DashMap` owned by this process. Suitable for a single
///   instance of the owner service.
/// - **Redis**: a shared Redis instance. There is no local tier, so an
///   eviction by one instance is immediately visible to all of them.
///
/// Every Redis call is bounded by `op_timeout`.
#[derive(Clone)]
pub enum CacheBackend {
    Local(Arc<DashMap<String, CachedEntry>>),
    Redis { pool: Pool, op_timeout: Duration },
}

impl CacheBackend {
    pub fn new_local() -> Self {
        CacheBackend::Local(Arc::new(DashMap::new()))
    }

    pub fn new_redis(pool: Pool, op_timeout: Duration) -> Self {
        CacheBackend::Redis { pool, op_timeout }
    }

    /// Build the backend described by `config`.
    ///
    /// Without `REDIS_URL` the in-process cache is used. With it, a pool is
    /// created and probed once; an unreachable server is logged but kept,
    /// since every later operation degrades to a miss until it comes back.
    pub async fn connect(config: &CacheConfig) -> Result<Self, CacheError> {
        let Some(url) = config.redis_url.as_deref() else {
            tracing::info!("REDIS_URL not set, using in-process cache");
            return Ok(Self::new_local());
        };

        let mut redis_config = deadpool_redis::Config::from_url(url);
        let mut pool_config = redis_config.pool.take().unwrap_or_default();
        pool_config.timeouts.wait = Some(config.op_timeout);
        pool_config.timeouts.create = Some(config.op_timeout);
        pool_config.timeouts.recycle = Some(config.op_timeout);
        redis_config.pool = Some(pool_config);

        let pool = redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1))?;
        let backend = Self::new_redis(pool, config.op_timeout);

        if backend.is_available().await {
            tracing::info!("Connected to Redis cache");
        } else {
            tracing::warn!("Redis cache unreachable at startup, reads will fall through to the store");
        }

        Ok(backend)
    }

    pub fn mode(&self) -> &'static str {
        match self {
            CacheBackend::Local(_) => "local",
            CacheBackend::Redis { .. } => "redis",
        }
    }

    /// Fetch the bytes stored under `key`. Expired entries read as absent.
    pub async fn get(&self, key: &str) -> Result<Option<Arc<Vec<u8>>>, CacheError> {
        match self {
            CacheBackend::Local(map) => {
                let hit = map.get(key).map(|entry| entry.clone());
                match hit {
                    Some(entry) if entry.is_expired() => {
                        map.remove_if(key, |_, e| e.is_expired());
                        Ok(None)
                    }
                    Some(entry) => Ok(Some(entry.data)),
                    None => Ok(None),
                }
            }
            CacheBackend::Redis { pool, op_timeout } => {
                bounded(*op_timeout, async {
                    let mut conn = pool.get().await?;
                    let data: Option<Vec<u8>> = conn.get(key).await?;
                    Ok::<_, CacheError>(data.map(Arc::new))
                })
                .await
            }
        }
    }

    /// Store `value` under `key`, replacing any previous value.
    pub async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        match self {
            CacheBackend::Local(map) => {
                map.insert(key.to_string(), CachedEntry::new(value, ttl));
                Ok(())
            }
            CacheBackend::Redis { pool, op_timeout } => {
                // Redis rejects a zero expiry.
                let ttl_secs = ttl.as_secs().max(1);
                bounded(*op_timeout, async {
                    let mut conn = pool.get().await?;
                    conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
                    Ok::<_, CacheError>(())
                })
                .await
            }
        }
    }

    /// Remove `key`. Removing an absent key is not an error.
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        match self {
            CacheBackend::Local(map) => {
                map.remove(key);
                Ok(())
            }
            CacheBackend::Redis { pool, op_timeout } => {
                bounded(*op_timeout, async {
                    let mut conn = pool.get().await?;
                    conn.del::<_, ()>(key).await?;
                    Ok::<_, CacheError>(())
                })
                .await
            }
        }
    }

    /// Remove every key starting with `prefix`. Returns how many were removed.
    ///
    /// On Redis this walks the keyspace with `SCAN`; the whole walk shares
    /// one `op_timeout` per round trip.
    pub async fn clear_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        match self {
            CacheBackend::Local(map) => {
                let before = map.len();
                map.retain(|key, _| !key.starts_with(prefix));
                Ok(before.saturating_sub(map.len()))
            }
            CacheBackend::Redis { pool, op_timeout } => {
                let mut conn = bounded(*op_timeout, async {
                    Ok::<_, CacheError>(pool.get().await?)
                })
                .await?;
                let pattern = format!("{prefix}*");
                let mut cursor: u64 = 0;
                let mut removed = 0;

                loop {
                    let (next, keys): (u64, Vec<String>) = bounded(*op_timeout, async {
                        let page: (u64, Vec<String>) = redis::cmd("SCAN")
                            .arg(cursor)
                            .arg("MATCH")
                            .arg(&pattern)
                            .arg("COUNT")
                            .arg(SCAN_BATCH)
                            .query_async(&mut conn)
                            .await?;
                        Ok::<_, CacheError>(page)
                    })
                    .await?;

                    if !keys.is_empty() {
                        let count = bounded(*op_timeout, async {
                            let count: usize = conn.del(&keys).await?;
                            Ok::<_, CacheError>(count)
                        })
                        .await?;
                        removed += count;
                    }

                    if next == 0 {
                        break;
                    }
                    cursor = next;
                }

                Ok(removed)
            }
        }
    }

    /// Whether the backend can serve requests right now.
    pub async fn is_available(&self) -> bool {
        match self {
            CacheBackend::Local(_) => true,
            CacheBackend::Redis { pool, op_timeout } => bounded(*op_timeout, async {
                let mut conn = pool.get().await?;
                let _: String = redis::cmd("PING").query_async(&mut conn).await?;
                Ok::<_, CacheError>(())
            })
            .await
            .is_ok(),
        }
    }
}

/// Run `fut` with an upper bound on its duration.
async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, CacheError>
where
    F: Future<Output = Result<T, CacheError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| CacheError::Timeout(limit))?
}
