//! HTTP request handlers for the mock server.

pub mod applications;
pub mod auth;
pub mod logs;
pub mod scans;

pub use applications::*;
pub use auth::*;
pub use logs::*;
pub use scans::*;

use axum::{
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

/// Error document in the shape the RIPS API uses.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "code": status.as_u16(), "message": message })),
    )
        .into_response()
}

pub(crate) fn unauthorized() -> Response {
    error_response(StatusCode::UNAUTHORIZED, "Authentication required")
}

pub(crate) fn not_found(what: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, &format!("{what} not found"))
}

/// Extract the fields under `root` from a form or JSON request body.
///
/// Form keys look like `application[name]`; JSON bodies look like
/// `{"application": {"name": ...}}`.
pub(crate) fn body_fields(headers: &HeaderMap, body: &str, root: &str) -> Map<String, Value> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    if is_json {
        return serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|mut doc| match doc.get_mut(root).map(Value::take) {
                Some(Value::Object(map)) => Some(map),
                _ => None,
            })
            .unwrap_or_default();
    }

    let prefix = format!("{root}[");
    url::form_urlencoded::parse(body.as_bytes())
        .filter_map(|(key, value)| {
            let field = key.strip_prefix(&prefix)?.strip_suffix(']')?.to_string();
            Some((field, Value::String(value.into_owned())))
        })
        .collect()
}
