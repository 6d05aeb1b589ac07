//! Typed, failure-tolerant view of one cache namespace.

use std::fmt::Display;
use std::marker::PhantomData;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::CacheBackend;
use crate::config::{CacheConfig, CacheNamespace};

/// JSON values of type `T` stored under `{prefix}{namespace}::{key}`.
///
/// No method here returns an error. A failed read is a miss, a failed write
/// or eviction is skipped; both are logged at `warn`. An entry that no
/// longer decodes is evicted and treated as a miss.
pub struct NamespaceCache<T> {
    backend: CacheBackend,
    namespace: CacheNamespace,
    prefix: String,
    ttl: Duration,
    _value: PhantomData<fn() -> T>,
}

impl<T> Clone for NamespaceCache<T> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            namespace: self.namespace,
            prefix: self.prefix.clone(),
            ttl: self.ttl,
            _value: PhantomData,
        }
    }
}

impl<T> NamespaceCache<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(
        backend: CacheBackend,
        namespace: CacheNamespace,
        key_prefix: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            backend,
            namespace,
            prefix: key_prefix.into(),
            ttl,
            _value: PhantomData,
        }
    }

    /// A namespace cache using the prefix and TTL from `config`.
    pub fn from_config(backend: CacheBackend, namespace: CacheNamespace, config: &CacheConfig) -> Self {
        Self::new(
            backend,
            namespace,
            config.key_prefix.clone(),
            config.ttl_for(namespace),
        )
    }

    pub fn namespace(&self) -> CacheNamespace {
        self.namespace
    }

    pub fn backend(&self) -> &CacheBackend {
        &self.backend
    }

    fn namespace_prefix(&self) -> String {
        format!("{}{}::", self.prefix, self.namespace.as_str())
    }

    /// Full backend key for `key`.
    pub fn key_for(&self, key: impl Display) -> String {
        format!("{}{key}", self.namespace_prefix())
    }

    /// Cached value for `key`, or `None` on a miss or any cache failure.
    pub async fn get(&self, key: impl Display) -> Option<T> {
        let full_key = self.key_for(key);

        let bytes = match self.backend.get(&full_key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!(key = %full_key, "cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %full_key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                tracing::debug!(key = %full_key, "cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(key = %full_key, error = %e, "Undecodable cache entry, evicting");
                if let Err(e) = self.backend.delete(&full_key).await {
                    tracing::warn!(key = %full_key, error = %e, "Cache eviction failed");
                }
                None
            }
        }
    }

    /// Store `value` under `key`, overwriting any previous entry.
    pub async fn put(&self, key: impl Display, value: &T) {
        let full_key = self.key_for(key);

        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(key = %full_key, error = %e, "Cache value not serializable, skipping write");
                return;
            }
        };

        match self.backend.set(&full_key, bytes, self.ttl).await {
            Ok(()) => tracing::debug!(key = %full_key, ttl_secs = self.ttl.as_secs(), "cache put"),
            Err(e) => tracing::warn!(key = %full_key, error = %e, "Cache write failed, skipping"),
        }
    }

    /// Remove the entry for `key`, if any.
    pub async fn evict(&self, key: impl Display) {
        let full_key = self.key_for(key);
        match self.backend.delete(&full_key).await {
            Ok(()) => tracing::debug!(key = %full_key, "cache evict"),
            Err(e) => tracing::warn!(key = %full_key, error = %e, "Cache eviction failed"),
        }
    }

    /// Remove every entry in this namespace. Returns how many were removed;
    /// a failed clear reports zero.
    pub async fn clear(&self) -> usize {
        let prefix = self.namespace_prefix();
        match self.backend.clear_prefix(&prefix).await {
            Ok(removed) => {
                tracing::warn!(namespace = %self.namespace, removed, "Cache namespace cleared");
                removed
            }
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, error = %e, "Cache clear failed");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ns: CacheNamespace) -> NamespaceCache<Vec<i32>> {
        NamespaceCache::new(CacheBackend::new_local(), ns, "test:", Duration::from_secs(60))
    }

    #[test]
    fn keys_carry_prefix_and_namespace() {
        let c = cache(CacheNamespace::UserPreferences);
        assert_eq!(c.key_for(42), "test:user-preferences::42");
    }

    #[tokio::test]
    async fn put_then_get_returns_value() {
        let c = cache(CacheNamespace::UserPreferences);
        c.put(1, &vec![1, 2, 3]).await;
        assert_eq!(c.get(1).await, Some(vec![1, 2, 3]));
        assert_eq!(c.get(2).await, None);
    }

    #[tokio::test]
    async fn put_overwrites() {
        let c = cache(CacheNamespace::UserPreferences);
        c.put(1, &vec![1]).await;
        c.put(1, &vec![2]).await;
        assert_eq!(c.get(1).await, Some(vec![2]));
    }

    #[tokio::test]
    async fn clear_only_touches_own_namespace() {
        let backend = CacheBackend::new_local();
        let ttl = Duration::from_secs(60);
        let prefs: NamespaceCache<i32> =
            NamespaceCache::new(backend.clone(), CacheNamespace::UserPreferences, "p:", ttl);
        let profiles: NamespaceCache<i32> =
            NamespaceCache::new(backend, CacheNamespace::UserProfiles, "p:", ttl);

        prefs.put(1, &10).await;
        prefs.put(2, &20).await;
        profiles.put(1, &30).await;

        assert_eq!(prefs.clear().await, 2);
        assert_eq!(prefs.clear().await, 0);
        assert_eq!(prefs.get(1).await, None);
        assert_eq!(profiles.get(1).await, Some(30));
    }

    #[tokio::test]
    async fn undecodable_entry_is_evicted() {
        let c = cache(CacheNamespace::UserPreferences);
        c.backend()
            .set(&c.key_for(9), b"not json".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(c.get(9).await, None);
        assert!(c.backend().get(&c.key_for(9)).await.unwrap().is_none());
    }
}
