//! Query-string extraction that rejects with the shared error envelope.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Like [`Query`], but a missing or malformed parameter becomes
/// [`AppError::BadRequest`] instead of axum's plain-text rejection.
///
/// ```ignore
/// async fn can_send(ApiQuery(q): ApiQuery<CanSendQuery>) -> AppResult<Json<()>> {
///     // q.user_id and q.channel are both present and well-typed here
/// }
/// ```
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ApiQuery(value))
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
    }
}
