use axum::http::StatusCode;

use crate::app::errors;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Unknown routes get the standard failure envelope instead of an empty body.
pub async fn not_found() -> axum::response::Response {
    errors::failure(StatusCode::NOT_FOUND, errors::ROUTE_NOT_FOUND)
}
