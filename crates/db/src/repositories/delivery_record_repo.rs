//! Repository for the append-only `delivery_records` table.

use prefgate_core::types::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::delivery::{DeliveryRecord, NewDeliveryRecord};

const COLUMNS: &str = "id, user_id, channel, message, sent_at";

/// Insert and read delivery records. There is no update or delete.
pub struct DeliveryRecordRepo;

impl DeliveryRecordRepo {
    /// Persist a record; `sent_at` is assigned by the database.
    pub async fn create(
        pool: &PgPool,
        input: &NewDeliveryRecord,
    ) -> Result<DeliveryRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO delivery_records (id, user_id, channel, message) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeliveryRecord>(&query)
            .bind(input.id)
            .bind(input.user_id)
            .bind(&input.channel)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<DeliveryRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM delivery_records WHERE id = $1");
        sqlx::query_as::<_, DeliveryRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Most recent records for a user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<DeliveryRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM delivery_records \
             WHERE user_id = $1 \
             ORDER BY sent_at DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, DeliveryRecord>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
