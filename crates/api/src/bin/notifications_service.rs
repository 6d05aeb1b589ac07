use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use prefgate_api::app;
use prefgate_api::config::{ServerConfig, StoreConfig, UsersClientConfig};
use prefgate_api::notifications::{
    Dispatcher, EligibilityChecker, PgDeliveryRecordStore, SenderRegistry, UsersServiceClient,
};
use prefgate_api::shutdown::shutdown_signal;
use prefgate_api::state::NotificationsState;
use prefgate_api::telemetry::init_tracing;

const DEFAULT_PORT: u16 = 8082;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing("prefgate_api=debug,tower_http=debug");

    // --- Configuration ---
    let config = ServerConfig::from_env(DEFAULT_PORT);
    let store_config = StoreConfig::from_env();
    let client_config = UsersClientConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        users_service = %client_config.base_url,
        "Loaded server configuration",
    );

    // --- Database ---
    let pool = prefgate_db::create_pool(
        &store_config.database_url,
        store_config.max_connections,
        store_config.timeout,
    )
    .await
    .expect("Failed to connect to database");

    prefgate_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    prefgate_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    // --- Dispatch ---
    let client = UsersServiceClient::new(&client_config).expect("Failed to build HTTP client");
    let gate = Arc::new(EligibilityChecker::new(Arc::new(client)));
    let records = Arc::new(PgDeliveryRecordStore::new(pool.clone()));
    let dispatcher = Dispatcher::new(
        gate,
        SenderRegistry::with_log_senders(),
        records,
        store_config.timeout,
    );
    let state = NotificationsState {
        dispatcher: Arc::new(dispatcher),
    };

    let app = app::notifications_app(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting notifications service");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal("notifications-service"))
        .await
        .expect("Server error");

    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(drain, pool.close()).await.is_err() {
        tracing::warn!("Database pool did not close in time");
    }
    tracing::info!("Graceful shutdown complete");
}
