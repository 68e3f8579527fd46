//! Repository audit endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tracing::info;

use author_audit_core::config::AuditConfig;
use author_audit_core::{RepoAuditReport, RepositoryReference};

use crate::api::parse_json_object;
use crate::api::status::AppError;
use crate::AppState;

const INVALID_REPO: &str = "Invalid GitHub repo URL (expected https://github.com/OWNER/REPO)";

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/audit", post(run_audit).fallback(super::not_found))
}

/// Validate `{repo, max_commits?}` and run the audit. Nothing is fetched
/// unless both fields are valid.
async fn run_audit(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<RepoAuditReport>, AppError> {
    let payload = parse_json_object(&body)?;

    let repo_input = payload.get("repo").and_then(Value::as_str).unwrap_or("");
    let repo = RepositoryReference::normalize(repo_input)
        .ok_or_else(|| AppError::BadRequest(INVALID_REPO.into()))?;

    let max_commits = parse_max_commits(payload.get("max_commits"), &state.config.audit)
        .map_err(AppError::BadRequest)?;

    info!(repo = %repo, max_commits, "audit requested");
    let report = state.engine.audit(&repo, max_commits).await?;
    Ok(Json(report))
}

/// Accepts an absent/null value (the configured default), a JSON integer, or
/// a string holding a decimal integer, within `1..=max_commits_limit`.
fn parse_max_commits(value: Option<&Value>, config: &AuditConfig) -> Result<u32, String> {
    let invalid = || {
        format!(
            "max_commits must be a number between 1 and {}",
            config.max_commits_limit
        )
    };

    let requested: i64 = match value {
        None | Some(Value::Null) => return Ok(config.default_max_commits),
        Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid)?,
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };

    if requested < 1 || requested > i64::from(config.max_commits_limit) {
        return Err(invalid());
    }
    u32::try_from(requested).map_err(|_| invalid())
}
