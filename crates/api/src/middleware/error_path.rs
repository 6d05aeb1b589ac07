//! Adds `path` to error envelopes produced by [`AppError`](crate::error::AppError).

use axum::extract::{OriginalUri, Request};
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ErrorEnvelope;

/// Re-render any [`ErrorEnvelope`] response with the request path set.
///
/// Responses that did not come from an `AppError` (successes, axum's own
/// rejections) pass through untouched. Status and headers are kept.
pub async fn attach_error_path(request: Request, next: Next) -> Response {
    // Nested routers see a stripped URI; report the one the client sent.
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let response = next.run(request).await;

    let Some(ErrorEnvelope(envelope)) = response.extensions().get::<ErrorEnvelope>().cloned()
    else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.extensions.remove::<ErrorEnvelope>();
    parts.headers.remove(CONTENT_LENGTH);

    let (_, body) = Json(envelope.with_path(path)).into_response().into_parts();
    Response::from_parts(parts, body)
}
