//! Shared middleware stack.
//!
//! Both binaries and the integration tests wrap their routers with
//! [`with_middleware`] so every service runs the same stack.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::middleware::from_fn;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::middleware::error_path::attach_error_path;
use crate::routes;
use crate::state::{NotificationsState, PreferencesState};

/// The preference service: `/health` plus `/api/v1/preferences`.
pub fn preferences_app(state: PreferencesState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .merge(routes::health::preferences_router())
        .nest("/api/v1", routes::preferences_api_routes())
        .with_state(state);
    with_middleware(router, config)
}

/// The notification service: `/health` plus `/api/v1/notifications`.
pub fn notifications_app(state: NotificationsState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .merge(routes::health::notifications_router())
        .nest("/api/v1", routes::notifications_api_routes())
        .with_state(state);
    with_middleware(router, config)
}

/// Apply the middleware stack, bottom-up:
///
/// 1. CORS
/// 2. Set request ID on incoming requests
/// 3. Structured request/response tracing
/// 4. Propagate request ID to response
/// 5. Request timeout
/// 6. Panic recovery (catch panics, return 500)
/// 7. Request path on error envelopes
pub fn with_middleware(router: Router, config: &ServerConfig) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    router
        .layer(from_fn(attach_error_path))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(build_cors_layer(config))
}

/// Build the CORS middleware layer from server configuration.
///
/// Panics at startup if any configured origin is invalid, so
/// misconfiguration fails fast.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
