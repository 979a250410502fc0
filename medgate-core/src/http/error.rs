use super::response::{json_response, Resp};
use crate::rbac::GuardError;
use http::header::{HeaderValue, ALLOW};
use http::StatusCode;
use serde_json::json;

/// Build a JSON error response with a uniform shape
/// {
///   "error": "Short label",
///   "message": "Human readable detail"
/// }
pub fn json_error(status: StatusCode, error: &str, message: &str) -> Resp {
    json_response(status, &json!({ "error": error, "message": message }))
}

/// Render a guard rejection
pub fn guard_error(err: &GuardError) -> Resp {
    json_response(err.status(), &err.body())
}

pub fn not_found() -> Resp {
    json_error(StatusCode::NOT_FOUND, "Not found", "No such endpoint")
}

pub fn bad_request(message: &str) -> Resp {
    json_error(StatusCode::BAD_REQUEST, "Bad request", message)
}

/// Generic 500; details stay in the server log
pub fn internal_error() -> Resp {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", "Something went wrong")
}

/// 405 Method Not Allowed with Allow header
pub fn method_not_allowed(allowed: &str) -> Resp {
    let mut response = json_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed",
        &format!("Allowed methods: {}", allowed),
    );
    if let Ok(value) = HeaderValue::from_str(allowed) {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}
