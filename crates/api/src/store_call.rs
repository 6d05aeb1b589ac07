//! Bounded calls into the durable store.

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Await a store operation for at most `limit`.
///
/// A timeout becomes [`AppError::Unavailable`]; store errors propagate as
/// [`AppError::Database`]. Dropping the inner future on timeout leaves no
/// partial state because every store call is a single statement.
pub async fn bounded<T, F>(limit: Duration, operation: &'static str, fut: F) -> AppResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => {
            tracing::warn!(operation, timeout_ms = limit.as_millis() as u64, "Store call timed out");
            Err(AppError::Unavailable(format!(
                "The data store did not respond within {}ms",
                limit.as_millis()
            )))
        }
    }
}
