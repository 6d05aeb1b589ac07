//! The durable store seam for preference records.

use async_trait::async_trait;
use prefgate_core::preferences::{PreferenceFields, PreferenceSnapshot};
use prefgate_core::types::{DbId, UserId};
use prefgate_db::models::preferences::PreferenceFilter;
use prefgate_db::repositories::PreferenceRepo;
use prefgate_db::DbPool;

/// Durable storage for preference records, one per user.
///
/// Implementations must enforce the one-record-per-user rule themselves;
/// the service checks first but a concurrent create can still race.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn find_by_user_id(&self, user_id: UserId)
        -> Result<Option<PreferenceSnapshot>, sqlx::Error>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<PreferenceSnapshot>, sqlx::Error>;

    async fn exists(&self, user_id: UserId) -> Result<bool, sqlx::Error>;

    async fn list_all(&self) -> Result<Vec<PreferenceSnapshot>, sqlx::Error>;

    async fn list_by_filter(
        &self,
        filter: PreferenceFilter,
    ) -> Result<Vec<PreferenceSnapshot>, sqlx::Error>;

    async fn insert(
        &self,
        user_id: UserId,
        fields: &PreferenceFields,
    ) -> Result<PreferenceSnapshot, sqlx::Error>;

    /// Replace every mutable field. `None` if the user has no record.
    async fn update(
        &self,
        user_id: UserId,
        fields: &PreferenceFields,
    ) -> Result<Option<PreferenceSnapshot>, sqlx::Error>;

    /// `true` if a record was removed.
    async fn delete(&self, user_id: UserId) -> Result<bool, sqlx::Error>;

    async fn is_healthy(&self) -> bool;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgPreferenceStore {
    pool: DbPool,
}

impl PgPreferenceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<PreferenceSnapshot>, sqlx::Error> {
        Ok(PreferenceRepo::find_by_user_id(&self.pool, user_id)
            .await?
            .map(Into::into))
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<PreferenceSnapshot>, sqlx::Error> {
        Ok(PreferenceRepo::find_by_id(&self.pool, id).await?.map(Into::into))
    }

    async fn exists(&self, user_id: UserId) -> Result<bool, sqlx::Error> {
        PreferenceRepo::exists_by_user_id(&self.pool, user_id).await
    }

    async fn list_all(&self) -> Result<Vec<PreferenceSnapshot>, sqlx::Error> {
        let rows = PreferenceRepo::list_all(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_filter(
        &self,
        filter: PreferenceFilter,
    ) -> Result<Vec<PreferenceSnapshot>, sqlx::Error> {
        let rows = PreferenceRepo::list_by_filter(&self.pool, filter).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(
        &self,
        user_id: UserId,
        fields: &PreferenceFields,
    ) -> Result<PreferenceSnapshot, sqlx::Error> {
        Ok(PreferenceRepo::create(&self.pool, user_id, fields).await?.into())
    }

    async fn update(
        &self,
        user_id: UserId,
        fields: &PreferenceFields,
    ) -> Result<Option<PreferenceSnapshot>, sqlx::Error> {
        Ok(PreferenceRepo::update(&self.pool, user_id, fields)
            .await?
            .map(Into::into))
    }

    async fn delete(&self, user_id: UserId) -> Result<bool, sqlx::Error> {
        PreferenceRepo::delete_by_user_id(&self.pool, user_id).await
    }

    async fn is_healthy(&self) -> bool {
        prefgate_db::health_check(&self.pool).await.is_ok()
    }
}
