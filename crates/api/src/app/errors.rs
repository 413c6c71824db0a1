use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::dto::Envelope;

pub fn envelope_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(Envelope::<()>::err(message))).into_response()
}

pub fn not_found() -> axum::response::Response {
    envelope_error(StatusCode::NOT_FOUND, "not found")
}

pub fn store_failure() -> axum::response::Response {
    envelope_error(StatusCode::INTERNAL_SERVER_ERROR, "store read failed")
}
