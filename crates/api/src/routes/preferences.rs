use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::preferences;
use crate::state::PreferencesState;

pub fn router() -> Router<PreferencesState> {
    Router::new()
        .route(
            "/",
            get(preferences::list_all).post(preferences::create_preferences),
        )
        .route("/email-enabled", get(preferences::list_email_enabled))
        .route("/push-enabled", get(preferences::list_push_enabled))
        .route("/marketing-enabled", get(preferences::list_marketing_enabled))
        .route("/cache", delete(preferences::clear_cache))
        .route(
            "/user/{user_id}",
            get(preferences::get_by_user)
                .put(preferences::update_preferences)
                .delete(preferences::delete_preferences),
        )
        .route("/user/{user_id}/exists", get(preferences::exists))
        .route("/{id}", get(preferences::get_by_id))
}
