//! HTTP API handlers.

pub mod export;
pub mod form;
pub mod theme;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Generate a success response JSON.
pub(crate) fn success_response(message: &str) -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "success": true, "message": message })),
    )
        .into_response()
}

/// Generate an error response JSON.
pub(crate) fn error_response(status: StatusCode, error_msg: &str) -> Response {
    (
        status,
        Json(serde_json::json!({ "success": false, "error": error_msg })),
    )
        .into_response()
}
