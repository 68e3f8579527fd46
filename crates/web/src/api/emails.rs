//! Outreach email endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use author_audit_core::notify::{EmailDispatcher, OutreachRequest, SendSummary};

use crate::api::parse_json_object;
use crate::api::status::AppError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/send-emails", post(send_emails).fallback(super::not_found))
}

async fn send_emails(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SendSummary>, AppError> {
    let payload = parse_json_object(&body)?;
    let request: OutreachRequest = serde_json::from_value(Value::Object(payload))
        .map_err(|e| AppError::BadRequest(format!("Invalid request: {}", e)))?;

    // Relay settings are checked before the request itself.
    let dispatcher = EmailDispatcher::new(&state.config.smtp)?;
    let summary = dispatcher.send_all(&request).await?;
    Ok(Json(summary))
}
