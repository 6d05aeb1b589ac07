use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use prefgate_core::envelope::ApiResponse;
use prefgate_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the shared error envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `prefgate_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A dependency did not answer in time.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut errors = Vec::new();

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string())
                }
                CoreError::AlreadyExists { .. } => {
                    (StatusCode::CONFLICT, "CONFLICT", core.to_string())
                }
                CoreError::Validation(messages) => {
                    errors.clone_from(messages);
                    (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        "Validation failed".to_string(),
                    )
                }
                CoreError::NotPermitted(msg) => {
                    (StatusCode::FORBIDDEN, "NOT_PERMITTED", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Unavailable(msg) => {
                tracing::warn!(error = %msg, "Dependency unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    msg.clone(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body: ApiResponse<()> = ApiResponse::error(message, status.as_u16(), code, errors);

        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(ErrorEnvelope(body));
        response
    }
}

/// The envelope an [`AppError`] rendered, kept on the response so
/// [`crate::middleware::error_path`] can stamp the request path into it.
#[derive(Debug, Clone)]
pub struct ErrorEnvelope(pub ApiResponse<()>);

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Pool acquisition timeouts map to 503.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::PoolTimedOut => {
            tracing::warn!("Database pool timed out");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                "The data store is temporarily unavailable".to_string(),
            )
        }
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
