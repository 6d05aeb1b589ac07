//! Eligibility-gated notification dispatch.

use std::sync::Arc;
use std::time::Duration;

use prefgate_core::channels::Channel;
use prefgate_core::error::CoreError;
use prefgate_core::types::UserId;
use prefgate_db::models::delivery::{DeliveryRecord, NewDeliveryRecord};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::notifications::eligibility::SendGate;
use crate::notifications::records::DeliveryRecordStore;
use crate::notifications::senders::SenderRegistry;
use crate::store_call::bounded;

pub struct Dispatcher {
    gate: Arc<dyn SendGate>,
    senders: SenderRegistry,
    records: Arc<dyn DeliveryRecordStore>,
    store_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        gate: Arc<dyn SendGate>,
        senders: SenderRegistry,
        records: Arc<dyn DeliveryRecordStore>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            gate,
            senders,
            records,
            store_timeout,
        }
    }

    pub async fn can_send(&self, user_id: UserId, channel: &str) -> bool {
        self.gate.can_send(user_id, channel).await
    }

    /// Check eligibility, hand the message to the channel's sender once,
    /// then persist a delivery record.
    ///
    /// A denied send fails with [`CoreError::NotPermitted`] before any
    /// sender or store call. Known channel names are stored in canonical
    /// upper case; unknown ones are stored as given.
    pub async fn send_notification(
        &self,
        user_id: UserId,
        channel: &str,
        message: &str,
    ) -> AppResult<DeliveryRecord> {
        if !self.gate.can_send(user_id, channel).await {
            tracing::info!(user_id, channel, "Notification blocked by user preferences");
            return Err(CoreError::NotPermitted(format!(
                "User {user_id} cannot receive {channel} notifications at this time"
            ))
            .into());
        }

        self.senders
            .dispatch(channel, user_id, message)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let stored_channel = match Channel::parse(channel) {
            Some(known) => known.as_str().to_string(),
            None => channel.trim().to_string(),
        };
        let new_record = NewDeliveryRecord::new(user_id, stored_channel, message);
        let record = bounded(
            self.store_timeout,
            "insert_delivery_record",
            self.records.insert(&new_record),
        )
        .await?;

        tracing::info!(
            user_id,
            channel = %record.channel,
            record_id = %record.id,
            "Notification sent",
        );
        Ok(record)
    }

    pub async fn find_record(&self, id: Uuid) -> AppResult<DeliveryRecord> {
        bounded(
            self.store_timeout,
            "find_delivery_record",
            self.records.find_by_id(id),
        )
        .await?
        .ok_or_else(|| AppError::Database(sqlx::Error::RowNotFound))
    }

    pub async fn recent_for_user(&self, user_id: UserId, limit: i64) -> AppResult<Vec<DeliveryRecord>> {
        bounded(
            self.store_timeout,
            "list_delivery_records",
            self.records.list_for_user(user_id, limit),
        )
        .await
    }

    pub async fn records_healthy(&self) -> bool {
        tokio::time::timeout(self.store_timeout, self.records.is_healthy())
            .await
            .unwrap_or(false)
    }
}
