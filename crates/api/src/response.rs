//! Success responses in the shared envelope.
//!
//! Errors go through [`crate::error::AppError`]; everything a handler
//! returns on success should come from here so both services agree on the
//! shape.

use axum::http::StatusCode;
use axum::Json;
use prefgate_core::envelope::ApiResponse;
use serde::Serialize;

/// `200 OK` with `data`.
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// `200 OK` with a message and `data`.
pub fn ok_with_message<T: Serialize>(message: &str, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}

/// `201 Created` with a message and `data`.
pub fn created<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(message, data)),
    )
}

/// `200 OK` carrying only a message.
pub fn message(message: &str) -> Json<ApiResponse<()>> {
    Json(ApiResponse::message_only(message))
}
