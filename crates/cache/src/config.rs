//! Cache namespaces and their deployment configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A logical cache namespace. Each has its own TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// Preference snapshots keyed by user id. Short-lived: read on every
    /// send-time eligibility check.
    UserPreferences,
    UserProfiles,
    NotificationSettings,
}

impl CacheNamespace {
    pub const ALL: [CacheNamespace; 3] = [
        CacheNamespace::UserPreferences,
        CacheNamespace::UserProfiles,
        CacheNamespace::NotificationSettings,
    ];

    /// Name used inside cache keys.
    pub fn as_str(self) -> &'static str {
        match self {
            CacheNamespace::UserPreferences => "user-preferences",
            CacheNamespace::UserProfiles => "user-profiles",
            CacheNamespace::NotificationSettings => "notification-settings",
        }
    }

    pub fn default_ttl(self) -> Duration {
        match self {
            CacheNamespace::UserPreferences => Duration::from_secs(120),
            CacheNamespace::UserProfiles => Duration::from_secs(30 * 60),
            CacheNamespace::NotificationSettings => Duration::from_secs(20 * 60),
        }
    }

    /// Environment variable overriding this namespace's TTL, in seconds.
    pub fn ttl_env_var(self) -> &'static str {
        match self {
            CacheNamespace::UserPreferences => "CACHE_TTL_USER_PREFERENCES_SECS",
            CacheNamespace::UserProfiles => "CACHE_TTL_USER_PROFILES_SECS",
            CacheNamespace::NotificationSettings => "CACHE_TTL_NOTIFICATION_SETTINGS_SECS",
        }
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis connection URL. `None` selects the in-process cache.
    pub redis_url: Option<String>,
    /// Prepended to every key (default: `prefgate:`).
    pub key_prefix: String,
    /// Upper bound on any single cache call (default: 500 ms).
    pub op_timeout: Duration,
    pub user_preferences_ttl: Duration,
    pub user_profiles_ttl: Duration,
    pub notification_settings_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: "prefgate:".to_string(),
            op_timeout: Duration::from_millis(500),
            user_preferences_ttl: CacheNamespace::UserPreferences.default_ttl(),
            user_profiles_ttl: CacheNamespace::UserProfiles.default_ttl(),
            notification_settings_ttl: CacheNamespace::NotificationSettings.default_ttl(),
        }
    }
}

impl CacheConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                                 | Default            |
    /// |-----------------------------------------|--------------------|
    /// | `REDIS_URL`                             | unset (in-process) |
    /// | `CACHE_KEY_PREFIX`                      | `prefgate:`        |
    /// | `CACHE_OP_TIMEOUT_MS`                   | `500`              |
    /// | `CACHE_TTL_USER_PREFERENCES_SECS`       | `120`              |
    /// | `CACHE_TTL_USER_PROFILES_SECS`          | `1800`             |
    /// | `CACHE_TTL_NOTIFICATION_SETTINGS_SECS`  | `1200`             |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let redis_url = std::env::var("REDIS_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let key_prefix = std::env::var("CACHE_KEY_PREFIX").unwrap_or(defaults.key_prefix);

        let op_timeout = Duration::from_millis(env_or("CACHE_OP_TIMEOUT_MS", 500));

        let ttl = |ns: CacheNamespace| {
            Duration::from_secs(env_or(ns.ttl_env_var(), ns.default_ttl().as_secs()))
        };

        Self {
            redis_url,
            key_prefix,
            op_timeout,
            user_preferences_ttl: ttl(CacheNamespace::UserPreferences),
            user_profiles_ttl: ttl(CacheNamespace::UserProfiles),
            notification_settings_ttl: ttl(CacheNamespace::NotificationSettings),
        }
    }

    /// The configured TTL for `namespace`.
    pub fn ttl_for(&self, namespace: CacheNamespace) -> Duration {
        match namespace {
            CacheNamespace::UserPreferences => self.user_preferences_ttl,
            CacheNamespace::UserProfiles => self.user_profiles_ttl,
            CacheNamespace::NotificationSettings => self.notification_settings_ttl,
        }
    }
}

/// Read and parse `key`, falling back to `default` when unset.
///
/// Panics on a present but malformed value so misconfiguration fails at
/// startup.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid number: {e}")),
        Err(_) => default,
    }
}
