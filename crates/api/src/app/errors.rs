use axum::http::StatusCode;
use serde_json::Value as JsonValue;

use crate::app::dto;

pub const POST_INVALID_BODY: &str =
    "Error POST: La solicitud contiene datos incorrectos o parámetros inválidos.";
pub const POST_FAILED: &str = "Error POST: La solicitud no pudo completarse correctamente.";
pub const GET_ONE_FAILED: &str =
    "Error service GETONE: The request contains an incorrect parameter or no record exists";
pub const GET_ALL_FAILED: &str =
    "Error service GETALL: The request contains an incorrect parameter or no record exists";
pub const PUT_FAILED: &str =
    "Error service PUT: The request contains an incorrect parameter or invalid parameter";
pub const DELETE_FAILED: &str =
    "Error service Delete: The request contains an incorrect parameter or invalid parameter";
pub const ROUTE_NOT_FOUND: &str = "Error: the requested route does not exist";

/// Failure envelope: `Success: false`, `Data: null`.
pub fn failure(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    let message = message.into();
    dto::respond(status, &message, JsonValue::Null)
}
