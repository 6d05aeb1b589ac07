//! Cache-aside access to preference records.
//!
//! | Operation    | Cache                                   | Store          |
//! |--------------|-----------------------------------------|----------------|
//! | `create`     | populated with the new snapshot         | insert         |
//! | `get`        | read first; populated on a store hit    | read on miss   |
//! | `update`     | overwritten with the new snapshot       | read + update  |
//! | `delete`     | evicted                                 | delete         |
//! | `clear_cache`| every entry in the namespace removed    | untouched      |
//! | listings     | bypassed                                | read           |
//!
//! Absence is never cached. Cache failures never surface; store failures
//! and store timeouts do.

use std::sync::Arc;
use std::time::Duration;

use prefgate_cache::NamespaceCache;
use prefgate_core::error::CoreError;
use prefgate_core::preferences::{merge, NewPreferences, PreferencePatch, PreferenceSnapshot};
use prefgate_core::types::{DbId, UserId};
use prefgate_core::validation::validate_input;
use prefgate_db::models::preferences::PreferenceFilter;

use crate::error::AppResult;
use crate::preferences::store::PreferenceStore;
use crate::store_call::bounded;

const ENTITY: &str = "UserPreferences";

pub struct PreferenceService {
    store: Arc<dyn PreferenceStore>,
    cache: NamespaceCache<PreferenceSnapshot>,
    store_timeout: Duration,
}

impl PreferenceService {
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        cache: NamespaceCache<PreferenceSnapshot>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            store_timeout,
        }
    }

    fn not_found(user_id: UserId) -> CoreError {
        CoreError::NotFound {
            entity: ENTITY,
            field: "userId",
            id: user_id,
        }
    }

    // -----------------------------------------------------------------------
    // Cache-aside operations
    // -----------------------------------------------------------------------

    /// Create the record for `input.user_id` and populate the cache.
    pub async fn create(&self, input: NewPreferences) -> AppResult<PreferenceSnapshot> {
        validate_input(&input)?;
        let user_id = input
            .user_id
            .ok_or_else(|| CoreError::validation("userId: User ID is required"))?;
        let fields = input.to_fields();
        fields.check()?;

        let exists = bounded(self.store_timeout, "exists", self.store.exists(user_id)).await?;
        if exists {
            return Err(CoreError::AlreadyExists {
                entity: ENTITY,
                field: "userId",
                id: user_id,
            }
            .into());
        }

        let snapshot = bounded(
            self.store_timeout,
            "insert",
            self.store.insert(user_id, &fields),
        )
        .await?;
        self.cache.put(user_id, &snapshot).await;

        tracing::info!(user_id, preference_id = snapshot.id, "Preferences created");
        Ok(snapshot)
    }

    /// Cached snapshot for `user_id`, falling back to the store.
    pub async fn get(&self, user_id: UserId) -> AppResult<PreferenceSnapshot> {
        if let Some(snapshot) = self.cache.get(user_id).await {
            return Ok(snapshot);
        }

        let snapshot = bounded(
            self.store_timeout,
            "find_by_user_id",
            self.store.find_by_user_id(user_id),
        )
        .await?
        .ok_or_else(|| Self::not_found(user_id))?;

        self.cache.put(user_id, &snapshot).await;
        Ok(snapshot)
    }

    /// Apply `patch` to the stored record and overwrite the cache entry.
    ///
    /// The existing record is always read from the store, never the cache,
    /// so the merge starts from the durable state.
    pub async fn update(
        &self,
        user_id: UserId,
        patch: PreferencePatch,
    ) -> AppResult<PreferenceSnapshot> {
        validate_input(&patch)?;

        let existing = bounded(
            self.store_timeout,
            "find_by_user_id",
            self.store.find_by_user_id(user_id),
        )
        .await?
        .ok_or_else(|| Self::not_found(user_id))?;

        let merged = merge(&existing.fields, &patch);
        merged.check()?;

        let snapshot = bounded(
            self.store_timeout,
            "update",
            self.store.update(user_id, &merged),
        )
        .await?
        .ok_or_else(|| Self::not_found(user_id))?;
        self.cache.put(user_id, &snapshot).await;

        tracing::info!(user_id, "Preferences updated");
        Ok(snapshot)
    }

    /// Delete the record and evict its cache entry.
    pub async fn delete(&self, user_id: UserId) -> AppResult<()> {
        let removed = bounded(self.store_timeout, "delete", self.store.delete(user_id)).await?;
        if !removed {
            // A stale entry may outlive a delete made elsewhere.
            self.cache.evict(user_id).await;
            return Err(Self::not_found(user_id).into());
        }

        self.cache.evict(user_id).await;
        tracing::info!(user_id, "Preferences deleted");
        Ok(())
    }

    /// Evict every cached snapshot. The store is not touched.
    pub async fn clear_cache(&self) -> usize {
        self.cache.clear().await
    }

    // -----------------------------------------------------------------------
    // Store-only reads
    // -----------------------------------------------------------------------

    /// Look up by the record's own id. Bypasses the cache.
    pub async fn get_by_id(&self, id: DbId) -> AppResult<PreferenceSnapshot> {
        bounded(self.store_timeout, "find_by_id", self.store.find_by_id(id))
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: ENTITY,
                    field: "id",
                    id,
                }
                .into()
            })
    }

    pub async fn list_all(&self) -> AppResult<Vec<PreferenceSnapshot>> {
        bounded(self.store_timeout, "list_all", self.store.list_all()).await
    }

    /// Records passing `filter`, for bulk sends.
    pub async fn list_filtered(&self, filter: PreferenceFilter) -> AppResult<Vec<PreferenceSnapshot>> {
        bounded(
            self.store_timeout,
            "list_by_filter",
            self.store.list_by_filter(filter),
        )
        .await
    }

    pub async fn exists(&self, user_id: UserId) -> AppResult<bool> {
        bounded(self.store_timeout, "exists", self.store.exists(user_id)).await
    }

    // -----------------------------------------------------------------------
    // Health
    // -----------------------------------------------------------------------

    pub async fn store_healthy(&self) -> bool {
        tokio::time::timeout(self.store_timeout, self.store.is_healthy())
            .await
            .unwrap_or(false)
    }

    pub async fn cache_healthy(&self) -> bool {
        self.cache.backend().is_available().await
    }

    pub fn cache_mode(&self) -> &'static str {
        self.cache.backend().mode()
    }
}
