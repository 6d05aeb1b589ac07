//! The response envelope spoken by both services.
//!
//! ```json
//! { "success": true, "message": "...", "data": { ... }, "timestamp": "...",
//!   "path": "...", "statusCode": 404, "code": "NOT_FOUND", "errors": ["..."] }
//! ```
//!
//! Optional members are omitted when empty. The notification service reads
//! this same type back when it fetches preferences from the owner service.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default = "chrono::Utc::now")]
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Machine-readable error code (`NOT_FOUND`, `CONFLICT`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            timestamp: chrono::Utc::now(),
            path: None,
            status_code: None,
            code: None,
            errors: None,
        }
    }

    /// Successful response with a human-readable message.
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(data)
        }
    }

    /// Failed response. `errors` is omitted when empty.
    pub fn error(
        message: impl Into<String>,
        status_code: u16,
        code: impl Into<String>,
        errors: Vec<String>,
    ) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            timestamp: chrono::Utc::now(),
            path: None,
            status_code: Some(status_code),
            code: Some(code.into()),
            errors: (!errors.is_empty()).then_some(errors),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl ApiResponse<()> {
    /// Successful response with a message and no payload.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            timestamp: chrono::Utc::now(),
            path: None,
            status_code: None,
            code: None,
            errors: None,
        }
    }
}
