//! Health and readiness endpoints. Public — not behind the auth middleware.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub app: String,
    pub uptime_seconds: u64,
    pub upstream: UpstreamSummary,
}

/// Which outbound surfaces are usable with the current configuration.
#[derive(Debug, Serialize)]
pub struct UpstreamSummary {
    pub base_url: String,
    pub crm_auth: bool,
    pub github_auth: bool,
    pub tools: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        app: "legion-mcp".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        upstream: UpstreamSummary {
            base_url: state.config.base_url.clone(),
            crm_auth: state.config.has_crm_auth(),
            github_auth: state.config.has_github_auth(),
            tools: state.registry.descriptors().count(),
        },
    })
}

/// GET /api/health/ready — lightweight readiness probe (no locks, no I/O).
/// The bridge has no async startup phase, so it is ready as soon as it binds.
pub async fn readiness(State(state): State<AppState>) -> axum::response::Response {
    let body = json!({
        "ready": true,
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    });
    (StatusCode::OK, Json(body)).into_response()
}
