use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notifications;
use crate::state::NotificationsState;

pub fn router() -> Router<NotificationsState> {
    Router::new()
        .route("/", get(notifications::status))
        .route("/send", post(notifications::send_notification))
        .route("/can-send", get(notifications::can_send))
        .route("/user/{user_id}", get(notifications::list_for_user))
        .route("/{id}", get(notifications::get_record))
}
