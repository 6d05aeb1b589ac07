//! Row model for the `user_preferences` table.
//!
//! Channel and category flags are stored as one boolean column each and
//! folded into the maps of [`PreferenceFields`] on the way out.

use chrono::NaiveTime;
use prefgate_core::channels::{Category, Channel};
use prefgate_core::preferences::{Frequency, PreferenceFields, PreferenceSnapshot};
use prefgate_core::types::{DbId, Timestamp, UserId};
use sqlx::FromRow;

/// A row from the `user_preferences` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserPreferencesRow {
    pub id: DbId,
    pub user_id: UserId,
    pub email_enabled: bool,
    pub push_enabled: bool,
    pub sms_enabled: bool,
    pub marketing_enabled: bool,
    pub security_enabled: bool,
    pub product_enabled: bool,
    #[sqlx(try_from = "String")]
    pub frequency: Frequency,
    pub quiet_hours_start: Option<NaiveTime>,
    pub quiet_hours_end: Option<NaiveTime>,
    pub timezone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<UserPreferencesRow> for PreferenceSnapshot {
    fn from(row: UserPreferencesRow) -> Self {
        PreferenceSnapshot {
            id: row.id,
            user_id: row.user_id,
            fields: PreferenceFields {
                channel_enabled: [
                    (Channel::Email, row.email_enabled),
                    (Channel::Push, row.push_enabled),
                    (Channel::Sms, row.sms_enabled),
                ]
                .into_iter()
                .collect(),
                category_enabled: [
                    (Category::Marketing, row.marketing_enabled),
                    (Category::Security, row.security_enabled),
                    (Category::Product, row.product_enabled),
                ]
                .into_iter()
                .collect(),
                frequency: row.frequency,
                quiet_hours_start: row.quiet_hours_start,
                quiet_hours_end: row.quiet_hours_end,
                timezone: row.timezone,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Store-side filters for bulk-send listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceFilter {
    EmailEnabled,
    PushEnabled,
    MarketingEnabled,
}

impl PreferenceFilter {
    /// The boolean column this filter selects on.
    pub fn column(self) -> &'static str {
        match self {
            PreferenceFilter::EmailEnabled => "email_enabled",
            PreferenceFilter::PushEnabled => "push_enabled",
            PreferenceFilter::MarketingEnabled => "marketing_enabled",
        }
    }

    /// Whether `fields` passes this filter.
    pub fn matches(self, fields: &PreferenceFields) -> bool {
        match self {
            PreferenceFilter::EmailEnabled => fields.channel(Channel::Email),
            PreferenceFilter::PushEnabled => fields.channel(Channel::Push),
            PreferenceFilter::MarketingEnabled => fields.category(Category::Marketing),
        }
    }
}
