use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port. The default differs per service.
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on post-shutdown cleanup in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `default_port`             |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env(default_port: u16) -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .map(|p| p.parse().expect("PORT must be a valid u16"))
            .unwrap_or(default_port);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
        }
    }
}

/// Durable store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Bound applied to every individual store call.
    pub timeout: Duration,
}

impl StoreConfig {
    /// | Env Var              | Default    |
    /// |----------------------|------------|
    /// | `DATABASE_URL`       | (required) |
    /// | `DB_MAX_CONNECTIONS` | `20`       |
    /// | `STORE_TIMEOUT_MS`   | `5000`     |
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let timeout_ms: u64 = std::env::var("STORE_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("STORE_TIMEOUT_MS must be a valid u64");

        Self {
            database_url,
            max_connections,
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}

/// Where the notification service finds the preference service.
#[derive(Debug, Clone)]
pub struct UsersClientConfig {
    /// Base URL including the API prefix, without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl UsersClientConfig {
    /// | Env Var                    | Default                        |
    /// |----------------------------|--------------------------------|
    /// | `USERS_SERVICE_URL`        | `http://localhost:8081/api/v1` |
    /// | `USERS_SERVICE_TIMEOUT_MS` | `2000`                         |
    pub fn from_env() -> Self {
        let base_url = std::env::var("USERS_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8081/api/v1".into())
            .trim_end_matches('/')
            .to_string();

        let timeout_ms: u64 = std::env::var("USERS_SERVICE_TIMEOUT_MS")
            .unwrap_or_else(|_| "2000".into())
            .parse()
            .expect("USERS_SERVICE_TIMEOUT_MS must be a valid u64");

        Self {
            base_url,
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}
