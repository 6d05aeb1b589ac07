use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::{NotificationsState, PreferencesState};

/// Health payload of the preference service.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesHealth {
    /// `ok` when the store is reachable, otherwise `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// An unhealthy cache does not degrade the service; reads fall through.
    pub cache_healthy: bool,
    pub cache_mode: &'static str,
}

/// Health payload of the notification service.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsHealth {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health
async fn preferences_health(State(state): State<PreferencesState>) -> Json<PreferencesHealth> {
    let (db_healthy, cache_healthy) =
        tokio::join!(state.service.store_healthy(), state.service.cache_healthy());

    Json(PreferencesHealth {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        cache_healthy,
        cache_mode: state.service.cache_mode(),
    })
}

/// GET /health
async fn notifications_health(
    State(state): State<NotificationsState>,
) -> Json<NotificationsHealth> {
    let db_healthy = state.dispatcher.records_healthy().await;

    Json(NotificationsHealth {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Root-level health route for the preference service.
pub fn preferences_router() -> Router<PreferencesState> {
    Router::new().route("/health", get(preferences_health))
}

/// Root-level health route for the notification service.
pub fn notifications_router() -> Router<NotificationsState> {
    Router::new().route("/health", get(notifications_health))
}
