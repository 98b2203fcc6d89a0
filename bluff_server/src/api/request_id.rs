//! Request ID middleware for log correlation.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied ID that is echoed back instead of replaced
const MAX_REQUEST_ID_LEN: usize = 128;

/// Reuse the caller's request ID if it is sane, otherwise mint one.
fn request_id_from(headers: &HeaderMap) -> HeaderValue {
    headers
        .get(REQUEST_ID_HEADER)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN && v.to_str().is_ok())
        .cloned()
        .unwrap_or_else(|| {
            // A hyphenated UUID is always a valid header value.
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        })
}

/// Tag every request with an `x-request-id`, run it inside a span carrying
/// that ID, and echo the ID on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request_id_from(request.headers());
    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id.clone());

    let span = tracing::info_span!(
        "request",
        request_id = request_id.to_str().unwrap_or_default(),
        method = %request.method(),
        uri = %request.uri(),
    );

    let mut response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| tracing::debug!(status = %response.status(), "Request completed"));
    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}
