//! Request ID middleware for request tracing and correlation.
//!
//! Each request gets an id that ends up on the tracing span, as a Sentry tag
//! and in the `x-request-id` response header. An id set by an upstream proxy
//! is reused when it looks like one; anything else is replaced by a UUID v4.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_UPSTREAM_ID_LEN: usize = 64;

/// Upstream id, if present and made only of ASCII alphanumerics, `-` and `_`.
fn upstream_request_id(headers: &HeaderMap) -> Option<String> {
    let id = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let well_formed = !id.is_empty()
        && id.len() <= MAX_UPSTREAM_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

    well_formed.then(|| id.to_owned())
}

/// Middleware that tags every request and response with a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id =
        upstream_request_id(request.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(id: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(REQUEST_ID_HEADER, HeaderValue::from_str(id).unwrap_or_else(|_| HeaderValue::from_static("")));
        map
    }

    #[test]
    fn test_reuses_well_formed_upstream_id() {
        assert_eq!(
            upstream_request_id(&headers("cf-8a2b_77")).as_deref(),
            Some("cf-8a2b_77")
        );
    }

    #[test]
    fn test_rejects_malformed_upstream_id() {
        assert_eq!(upstream_request_id(&HeaderMap::new()), None);
        assert_eq!(upstream_request_id(&headers("")), None);
        assert_eq!(upstream_request_id(&headers("id with spaces")), None);
        assert_eq!(upstream_request_id(&headers(&"a".repeat(65))), None);
    }
}
