use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use prefgate_api::app;
use prefgate_api::config::{ServerConfig, StoreConfig};
use prefgate_api::preferences::{PgPreferenceStore, PreferenceService};
use prefgate_api::shutdown::shutdown_signal;
use prefgate_api::state::PreferencesState;
use prefgate_api::telemetry::init_tracing;
use prefgate_cache::{CacheBackend, CacheConfig, CacheNamespace, NamespaceCache};

const DEFAULT_PORT: u16 = 8081;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing("prefgate_api=debug,prefgate_cache=debug,tower_http=debug");

    // --- Configuration ---
    let config = ServerConfig::from_env(DEFAULT_PORT);
    let store_config = StoreConfig::from_env();
    let cache_config = CacheConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = prefgate_db::create_pool(
        &store_config.database_url,
        store_config.max_connections,
        store_config.timeout,
    )
    .await
    .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    prefgate_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    prefgate_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Cache ---
    let backend = CacheBackend::connect(&cache_config)
        .await
        .expect("Invalid cache configuration");
    let cache = NamespaceCache::from_config(backend, CacheNamespace::UserPreferences, &cache_config);
    tracing::info!(
        mode = cache.backend().mode(),
        ttl_secs = cache_config.ttl_for(CacheNamespace::UserPreferences).as_secs(),
        "Preference cache ready",
    );

    // --- App state ---
    let store = Arc::new(PgPreferenceStore::new(pool.clone()));
    let service = PreferenceService::new(store, cache, store_config.timeout);
    let state = PreferencesState {
        service: Arc::new(service),
    };

    let app = app::preferences_app(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting preferences service");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal("preferences-service"))
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(drain, pool.close()).await.is_err() {
        tracing::warn!("Database pool did not close in time");
    }
    tracing::info!("Graceful shutdown complete");
}
