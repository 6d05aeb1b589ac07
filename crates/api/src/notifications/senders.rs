//! Per-channel transports. Real delivery is out of scope; the bundled
//! senders only log.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use prefgate_core::channels::Channel;
use prefgate_core::types::UserId;

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("{channel} transport failed: {reason}")]
    Transport { channel: Channel, reason: String },
}

/// Delivers a message over one channel.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    async fn send(&self, user_id: UserId, message: &str) -> Result<(), SendError>;
}

/// Placeholder transport that records the send in the log.
pub struct LogSender {
    channel: Channel,
}

impl LogSender {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl ChannelSender for LogSender {
    async fn send(&self, user_id: UserId, message: &str) -> Result<(), SendError> {
        tracing::info!(
            channel = %self.channel,
            user_id,
            message_len = message.len(),
            "Notification handed to transport",
        );
        Ok(())
    }
}

/// Channel name to sender routing.
#[derive(Clone, Default)]
pub struct SenderRegistry {
    senders: HashMap<Channel, Arc<dyn ChannelSender>>,
}

impl SenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with a [`LogSender`] for every known channel.
    pub fn with_log_senders() -> Self {
        let mut registry = Self::new();
        for channel in Channel::ALL {
            registry.register(channel, Arc::new(LogSender::new(channel)));
        }
        registry
    }

    pub fn register(&mut self, channel: Channel, sender: Arc<dyn ChannelSender>) {
        self.senders.insert(channel, sender);
    }

    /// Send through the sender for `channel`.
    ///
    /// An unknown channel is a logged no-op that counts as sent. A known
    /// channel with no sender registered is a transport failure.
    pub async fn dispatch(
        &self,
        channel: &str,
        user_id: UserId,
        message: &str,
    ) -> Result<(), SendError> {
        let Some(known) = Channel::parse(channel) else {
            tracing::warn!(user_id, channel, "Unknown channel, skipping transport");
            return Ok(());
        };

        match self.senders.get(&known) {
            Some(sender) => sender.send(user_id, message).await,
            None => Err(SendError::Transport {
                channel: known,
                reason: "no sender registered".to_string(),
            }),
        }
    }
}
