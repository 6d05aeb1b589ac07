//! HTTP services for notification preferences and notification dispatch.
//!
//! Two binaries share this library:
//!
//! - `preferences-service` owns preference records and serves them through
//!   the cache-aside [`preferences::PreferenceService`].
//! - `notifications-service` asks the first service for a user's
//!   preferences before every send and records each delivery.
//!
//! Config, error mapping, the middleware stack and shutdown handling are
//! shared so both behave identically at the HTTP edge.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod preferences;
pub mod query;
pub mod response;
pub mod routes;
pub mod shutdown;
pub mod state;
pub mod store_call;
pub mod telemetry;
