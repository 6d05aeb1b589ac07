//! Well-known notification channel and category names.
//!
//! Channel names travel over the wire in upper case (`EMAIL`, `PUSH`, `SMS`)
//! but callers may send any casing; [`Channel::parse`] is the single place
//! that normalizes them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Email channel name as stored in delivery records.
pub const CHANNEL_EMAIL: &str = "EMAIL";

/// Mobile push channel name.
pub const CHANNEL_PUSH: &str = "PUSH";

/// SMS channel name.
pub const CHANNEL_SMS: &str = "SMS";

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// A delivery channel a user can enable or disable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Channel {
    Email,
    Push,
    Sms,
}

impl Channel {
    /// Every known channel, in display order.
    pub const ALL: [Channel; 3] = [Channel::Email, Channel::Push, Channel::Sms];

    /// Parse a channel name case-insensitively. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Channel> {
        let name = name.trim();
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Email => CHANNEL_EMAIL,
            Channel::Push => CHANNEL_PUSH,
            Channel::Sms => CHANNEL_SMS,
        }
    }

    /// Value used when a create request does not mention this channel.
    pub fn default_enabled(self) -> bool {
        match self {
            Channel::Email | Channel::Push => true,
            Channel::Sms => false,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A notification category a user can opt in or out of.
///
/// Stored alongside channel flags but not consulted by the eligibility
/// evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Marketing,
    Security,
    Product,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Marketing, Category::Security, Category::Product];

    /// Value used when a create request does not mention this category.
    pub fn default_enabled(self) -> bool {
        match self {
            Category::Marketing => false,
            Category::Security | Category::Product => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Channel::parse("email"), Some(Channel::Email));
        assert_eq!(Channel::parse("Push"), Some(Channel::Push));
        assert_eq!(Channel::parse("SMS"), Some(Channel::Sms));
        assert_eq!(Channel::parse(" sms "), Some(Channel::Sms));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(Channel::parse("pigeon"), None);
        assert_eq!(Channel::parse(""), None);
    }

    #[test]
    fn channel_serializes_upper_case() {
        let json = serde_json::to_string(&Channel::Push).unwrap();
        assert_eq!(json, "\"PUSH\"");
    }

    #[test]
    fn category_serializes_lower_case() {
        let json = serde_json::to_string(&Category::Marketing).unwrap();
        assert_eq!(json, "\"marketing\"");
    }

    #[test]
    fn defaults_match_opt_in_policy() {
        assert!(Channel::Email.default_enabled());
        assert!(Channel::Push.default_enabled());
        assert!(!Channel::Sms.default_enabled());
        assert!(!Category::Marketing.default_enabled());
        assert!(Category::Security.default_enabled());
        assert!(Category::Product.default_enabled());
    }
}
