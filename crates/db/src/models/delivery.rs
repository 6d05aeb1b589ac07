//! Delivery record entity model.

use prefgate_core::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `delivery_records` table. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub channel: String,
    pub message: String,
    pub sent_at: Timestamp,
}

/// Input for writing a delivery record. `sent_at` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewDeliveryRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub channel: String,
    pub message: String,
}

impl NewDeliveryRecord {
    /// A record with a freshly generated, time-ordered id.
    pub fn new(user_id: UserId, channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            channel: channel.into(),
            message: message.into(),
        }
    }
}
