//! Fail-closed send-time eligibility.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use prefgate_core::eligibility::{can_deliver, local_time};
use prefgate_core::types::{Timestamp, UserId};

use crate::notifications::client::PreferenceSource;

/// Decides whether a notification may be sent right now.
#[async_trait]
pub trait SendGate: Send + Sync {
    async fn can_send(&self, user_id: UserId, channel: &str) -> bool;
}

/// Fetches preferences remotely and evaluates them.
///
/// Any failure to obtain a snapshot yields `false`.
pub struct EligibilityChecker {
    source: Arc<dyn PreferenceSource>,
}

impl EligibilityChecker {
    pub fn new(source: Arc<dyn PreferenceSource>) -> Self {
        Self { source }
    }

    /// Eligibility at instant `now`, evaluated in the user's time zone.
    pub async fn can_send_at(&self, user_id: UserId, channel: &str, now: Timestamp) -> bool {
        let snapshot = match self.source.fetch(user_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    user_id,
                    channel,
                    error = %e,
                    "Preference lookup failed, denying send",
                );
                return false;
            }
        };

        let wall_clock = local_time(&snapshot.fields.timezone, now);
        let allowed = can_deliver(&snapshot, channel, wall_clock);
        tracing::debug!(user_id, channel, allowed, %wall_clock, "Eligibility evaluated");
        allowed
    }
}

#[async_trait]
impl SendGate for EligibilityChecker {
    async fn can_send(&self, user_id: UserId, channel: &str) -> bool {
        self.can_send_at(user_id, channel, Utc::now()).await
    }
}
