//! Consumer side: eligibility-gated dispatch with a delivery record per send.

pub mod client;
pub mod dispatch;
pub mod eligibility;
pub mod records;
pub mod senders;

pub use client::{ClientError, PreferenceSource, UsersServiceClient};
pub use dispatch::Dispatcher;
pub use eligibility::{EligibilityChecker, SendGate};
pub use records::{DeliveryRecordStore, PgDeliveryRecordStore};
pub use senders::{ChannelSender, LogSender, SendError, SenderRegistry};
