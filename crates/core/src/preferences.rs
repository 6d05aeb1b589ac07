//! User notification preference records and their inputs.
//!
//! A user owns at most one [`PreferenceSnapshot`]. It is created from a
//! [`NewPreferences`] (missing fields take documented defaults) and changed
//! through a [`PreferencePatch`], where every field is optional and an
//! explicit `null` on a quiet-hours bound is distinct from leaving it out.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::channels::{Category, Channel};
use crate::error::CoreError;
use crate::types::{DbId, Timestamp, UserId};

/// Time zone assigned when a create request does not carry one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Upper bound on the stored time zone identifier (column width).
pub const MAX_TIMEZONE_LEN: usize = 50;

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

/// How often the user would like to be notified. Stored as a hint only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    #[default]
    Instant,
    Hourly,
    Daily,
    Weekly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Instant => "INSTANT",
            Frequency::Hourly => "HOURLY",
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INSTANT" => Ok(Frequency::Instant),
            "HOURLY" => Ok(Frequency::Hourly),
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            other => Err(CoreError::validation(format!(
                "frequency: unknown value '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Mutable fields
// ---------------------------------------------------------------------------

/// The user-editable part of a preference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceFields {
    pub channel_enabled: BTreeMap<Channel, bool>,
    pub category_enabled: BTreeMap<Category, bool>,
    pub frequency: Frequency,
    pub quiet_hours_start: Option<NaiveTime>,
    pub quiet_hours_end: Option<NaiveTime>,
    pub timezone: String,
}

impl Default for PreferenceFields {
    fn default() -> Self {
        Self {
            channel_enabled: Channel::ALL
                .into_iter()
                .map(|c| (c, c.default_enabled()))
                .collect(),
            category_enabled: Category::ALL
                .into_iter()
                .map(|c| (c, c.default_enabled()))
                .collect(),
            frequency: Frequency::default(),
            quiet_hours_start: None,
            quiet_hours_end: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl PreferenceFields {
    /// Whether `channel` is enabled. Missing keys read as disabled.
    pub fn channel(&self, channel: Channel) -> bool {
        self.channel_enabled.get(&channel).copied().unwrap_or(false)
    }

    /// Whether `category` is enabled. Missing keys read as disabled.
    pub fn category(&self, category: Category) -> bool {
        self.category_enabled.get(&category).copied().unwrap_or(false)
    }

    /// Record-level invariants that single-field validation cannot express.
    ///
    /// Runs on the final record, so a patch that sets only one quiet-hours
    /// bound on a record without quiet hours is rejected here.
    pub fn check(&self) -> Result<(), CoreError> {
        let mut errors = Vec::new();

        if self.quiet_hours_start.is_some() != self.quiet_hours_end.is_some() {
            errors.push(
                "quietHours: start and end must both be set or both be empty".to_string(),
            );
        }

        let tz = self.timezone.trim();
        if tz.is_empty() {
            errors.push("timezone: must not be blank".to_string());
        } else if tz.chars().count() > MAX_TIMEZONE_LEN {
            errors.push(format!(
                "timezone: must not exceed {MAX_TIMEZONE_LEN} characters"
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The stored preference record for one user.
///
/// This is also the cached value and the payload of the owner service's
/// `GET /preferences/user/{userId}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSnapshot {
    pub id: DbId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub fields: PreferenceFields,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PreferenceSnapshot {
    /// Equality ignoring the store-assigned audit timestamps.
    pub fn same_content(&self, other: &PreferenceSnapshot) -> bool {
        self.id == other.id && self.user_id == other.user_id && self.fields == other.fields
    }
}

// ---------------------------------------------------------------------------
// Create input
// ---------------------------------------------------------------------------

/// Input for creating a user's preferences.
///
/// Channel and category maps may be partial; missing keys take the
/// defaults from [`Channel::default_enabled`] / [`Category::default_enabled`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPreferences {
    #[validate(
        required(message = "User ID is required"),
        range(min = 1, message = "User ID must be positive")
    )]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub channel_enabled: BTreeMap<Channel, bool>,
    #[serde(default)]
    pub category_enabled: BTreeMap<Category, bool>,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    #[serde(default)]
    pub quiet_hours_start: Option<NaiveTime>,
    #[serde(default)]
    pub quiet_hours_end: Option<NaiveTime>,
    #[validate(length(min = 1, max = 50, message = "Timezone must be 1 to 50 characters"))]
    #[serde(default)]
    pub timezone: Option<String>,
}

impl NewPreferences {
    /// An all-defaults create request for `user_id`.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Resolve defaults into the full field set.
    pub fn to_fields(&self) -> PreferenceFields {
        let mut fields = PreferenceFields::default();
        fields.channel_enabled.extend(&self.channel_enabled);
        fields.category_enabled.extend(&self.category_enabled);
        if let Some(frequency) = self.frequency {
            fields.frequency = frequency;
        }
        fields.quiet_hours_start = self.quiet_hours_start;
        fields.quiet_hours_end = self.quiet_hours_end;
        if let Some(tz) = &self.timezone {
            fields.timezone = tz.trim().to_string();
        }
        fields
    }
}

// ---------------------------------------------------------------------------
// Partial update
// ---------------------------------------------------------------------------

/// Partial update of a user's preferences.
///
/// For every field `None` means "leave unchanged". Quiet-hours bounds use
/// `Option<Option<_>>` so that JSON `null` (`Some(None)`) clears the bound
/// while an omitted key (`None`) keeps it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreferencePatch {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub channel_enabled: BTreeMap<Channel, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub category_enabled: BTreeMap<Category, bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub quiet_hours_start: Option<Option<NaiveTime>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub quiet_hours_end: Option<Option<NaiveTime>>,
    #[validate(length(min = 1, max = 50, message = "Timezone must be 1 to 50 characters"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Wrap any present value (including `null`) in `Some`, so an omitted key
/// stays `None` via `#[serde(default)]`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl PreferencePatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.channel_enabled.is_empty()
            && self.category_enabled.is_empty()
            && self.frequency.is_none()
            && self.quiet_hours_start.is_none()
            && self.quiet_hours_end.is_none()
            && self.timezone.is_none()
    }
}

/// Merge a partial update onto an existing record.
///
/// Only fields present in `patch` are replaced; map fields merge per key.
pub fn merge(existing: &PreferenceFields, patch: &PreferencePatch) -> PreferenceFields {
    let mut merged = existing.clone();
    merged.channel_enabled.extend(&patch.channel_enabled);
    merged.category_enabled.extend(&patch.category_enabled);
    if let Some(frequency) = patch.frequency {
        merged.frequency = frequency;
    }
    if let Some(start) = patch.quiet_hours_start {
        merged.quiet_hours_start = start;
    }
    if let Some(end) = patch.quiet_hours_end {
        merged.quiet_hours_end = end;
    }
    if let Some(tz) = &patch.timezone {
        merged.timezone = tz.trim().to_string();
    }
    merged
}
