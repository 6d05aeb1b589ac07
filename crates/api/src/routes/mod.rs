pub mod health;
pub mod notifications;
pub mod preferences;

use axum::Router;

use crate::state::{NotificationsState, PreferencesState};

/// The preference service's `/api/v1` tree.
///
/// ```text
/// /preferences                         list (GET), create (POST)
/// /preferences/{id}                    get by record id
/// /preferences/user/{user_id}          get, update (PUT), delete
/// /preferences/user/{user_id}/exists   existence check
/// /preferences/email-enabled           bulk-send listing
/// /preferences/push-enabled            bulk-send listing
/// /preferences/marketing-enabled       bulk-send listing
/// /preferences/cache                   evict all cached snapshots (DELETE)
/// ```
pub fn preferences_api_routes() -> Router<PreferencesState> {
    Router::new().nest("/preferences", preferences::router())
}

/// The notification service's `/api/v1` tree.
///
/// ```text
/// /notifications                       service status
/// /notifications/send                  send (POST)
/// /notifications/can-send              eligibility query
/// /notifications/user/{user_id}        recent delivery records
/// /notifications/{id}                  one delivery record
/// ```
pub fn notifications_api_routes() -> Router<NotificationsState> {
    Router::new().nest("/notifications", notifications::router())
}
