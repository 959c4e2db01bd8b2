//! Request tracking middleware
//!
//! Every request gets an `x-request-id` (a `req_` TypeID) unless the client
//! sent one. The id is copied onto the response, recorded on the request's
//! trace span, and credential headers are marked sensitive so the trace
//! layer masks them.

use axum::http::{header, HeaderName, Request};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};
use tracing::Span;

use crate::ids::MakeTypedRequestId;

/// Header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: [HeaderName; 5] = [
    header::AUTHORIZATION,
    header::COOKIE,
    header::SET_COOKIE,
    HeaderName::from_static("x-api-key"),
    HeaderName::from_static("x-auth-token"),
];

/// Create a request ID layer that generates type-safe request IDs.
///
/// Example format: `req_01h455vb4pex5vsknk084sn02q`
pub fn request_id_layer() -> SetRequestIdLayer<MakeTypedRequestId> {
    SetRequestIdLayer::x_request_id(MakeTypedRequestId)
}

/// Create a request ID propagation layer
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Create a sensitive headers layer
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new(SENSITIVE_HEADERS)
}

/// Span for one HTTP request, tagged with its request id
pub fn request_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
