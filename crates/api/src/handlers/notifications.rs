//! Handlers for `/api/v1/notifications`.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use prefgate_core::error::CoreError;
use prefgate_core::types::UserId;
use prefgate_core::validation::validate_input;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::query::ApiQuery;
use crate::response;
use crate::state::NotificationsState;

/// Default and maximum page size for delivery-record listings.
const DEFAULT_RECORD_LIMIT: i64 = 50;
const MAX_RECORD_LIMIT: i64 = 500;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    #[validate(
        required(message = "User ID is required"),
        range(min = 1, message = "User ID must be positive")
    )]
    pub user_id: Option<UserId>,
    #[serde(default)]
    #[validate(length(max = 20, message = "Channel must not exceed 20 characters"))]
    pub channel: String,
    #[serde(default)]
    pub message: String,
}

impl SendNotificationRequest {
    /// Derive-based rules plus the blank checks `validator` cannot express.
    fn check(&self) -> Result<UserId, CoreError> {
        let mut errors = match validate_input(self) {
            Ok(()) => Vec::new(),
            Err(CoreError::Validation(messages)) => messages,
            Err(other) => return Err(other),
        };
        if self.channel.trim().is_empty() {
            errors.push("channel: Channel is required".to_string());
        }
        if self.message.trim().is_empty() {
            errors.push("message: Message is required".to_string());
        }

        match self.user_id {
            Some(user_id) if errors.is_empty() => Ok(user_id),
            _ => {
                errors.sort();
                Err(CoreError::Validation(errors))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanSendQuery {
    pub user_id: UserId,
    pub channel: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanSendResponse {
    pub user_id: UserId,
    pub channel: String,
    pub can_send: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecordListQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/notifications
pub async fn status() -> impl IntoResponse {
    response::message("Notification service is running")
}

/// POST /api/v1/notifications/send
pub async fn send_notification(
    State(state): State<NotificationsState>,
    Json(input): Json<SendNotificationRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = input.check()?;
    let record = state
        .dispatcher
        .send_notification(user_id, &input.channel, &input.message)
        .await?;
    Ok(response::created("Notification sent successfully", record))
}

/// GET /api/v1/notifications/can-send?userId=&channel=
pub async fn can_send(
    State(state): State<NotificationsState>,
    ApiQuery(query): ApiQuery<CanSendQuery>,
) -> AppResult<impl IntoResponse> {
    let can_send = state
        .dispatcher
        .can_send(query.user_id, &query.channel)
        .await;
    Ok(response::ok(CanSendResponse {
        user_id: query.user_id,
        channel: query.channel,
        can_send,
    }))
}

/// GET /api/v1/notifications/user/{user_id}?limit=
pub async fn list_for_user(
    State(state): State<NotificationsState>,
    Path(user_id): Path<UserId>,
    ApiQuery(query): ApiQuery<RecordListQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECORD_LIMIT)
        .clamp(1, MAX_RECORD_LIMIT);
    let records = state.dispatcher.recent_for_user(user_id, limit).await?;
    Ok(response::ok(records))
}

/// GET /api/v1/notifications/{id}
pub async fn get_record(
    State(state): State<NotificationsState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let record = state.dispatcher.find_record(id).await?;
    Ok(response::ok(record))
}
