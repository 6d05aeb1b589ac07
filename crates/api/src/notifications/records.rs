//! The delivery-record store seam.

use async_trait::async_trait;
use prefgate_core::types::UserId;
use prefgate_db::models::delivery::{DeliveryRecord, NewDeliveryRecord};
use prefgate_db::repositories::DeliveryRecordRepo;
use prefgate_db::DbPool;
use uuid::Uuid;

/// Append-only storage for delivery records.
#[async_trait]
pub trait DeliveryRecordStore: Send + Sync {
    async fn insert(&self, record: &NewDeliveryRecord) -> Result<DeliveryRecord, sqlx::Error>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DeliveryRecord>, sqlx::Error>;

    /// Newest first, at most `limit`.
    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<DeliveryRecord>, sqlx::Error>;

    async fn is_healthy(&self) -> bool;
}

#[derive(Clone)]
pub struct PgDeliveryRecordStore {
    pool: DbPool,
}

impl PgDeliveryRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeliveryRecordStore for PgDeliveryRecordStore {
    async fn insert(&self, record: &NewDeliveryRecord) -> Result<DeliveryRecord, sqlx::Error> {
        DeliveryRecordRepo::create(&self.pool, record).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DeliveryRecord>, sqlx::Error> {
        DeliveryRecordRepo::find_by_id(&self.pool, id).await
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<DeliveryRecord>, sqlx::Error> {
        DeliveryRecordRepo::list_for_user(&self.pool, user_id, limit).await
    }

    async fn is_healthy(&self) -> bool {
        prefgate_db::health_check(&self.pool).await.is_ok()
    }
}
