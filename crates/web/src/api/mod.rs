//! REST API endpoint modules.

pub mod assets;
pub mod audit;
pub mod emails;
pub mod status;

use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::Value;

use crate::api::status::AppError;

/// Plain-text 404 used for unknown paths and unsupported methods.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Decode a request body as a JSON object. An empty body counts as `{}`.
pub(crate) fn parse_json_object(body: &Bytes) -> Result<serde_json::Map<String, Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Map::new());
    }
    let text = String::from_utf8_lossy(body);
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::BadRequest("Request body must be a JSON object".into())),
        Err(_) => Err(AppError::BadRequest("Invalid JSON".into())),
    }
}
