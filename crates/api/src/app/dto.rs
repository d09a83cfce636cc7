use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use agenda_core::RecordId;

/// Uniform response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope<T> {
    pub success: bool,
    /// HTTP status code as a string (`"200"`, `"404"`, ...).
    pub status: String,
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            success: status.is_success(),
            status: status.as_u16().to_string(),
            message: message.into(),
            data,
        }
    }
}

/// Payload of a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub id: RecordId,
}

pub fn respond<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    (status, Json(Envelope::new(status, message, data))).into_response()
}
