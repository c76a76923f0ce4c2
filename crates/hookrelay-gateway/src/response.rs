//! Rendering of status bodies as HTTP responses.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use hookrelay_core::types::StatusBody;

pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Mirror `body.status` as the HTTP status and add JSON + open CORS headers.
/// `Access-Control-Allow-Methods` echoes the request method.
pub fn render(method: &Method, body: &StatusBody) -> Response {
    let code = StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut resp = (code, body.to_json()).into_response();

    let headers = resp.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    if let Ok(value) = HeaderValue::from_str(method.as_str()) {
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, value);
    }
    resp
}

/// Answer a CORS preflight for the webhook route.
pub fn preflight(request_headers: &HeaderMap) -> Response {
    let methods = request_headers
        .get("access-control-request-method")
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("POST, OPTIONS"));

    let mut resp = StatusCode::NO_CONTENT.into_response();
    let headers = resp.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, methods);
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    resp
}
