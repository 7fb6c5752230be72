use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde_json::json;

use crate::AppState;

/// GET /
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "service": state.config.service_name,
        "version": state.config.service_version,
        "status": "running"
    }))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version
    }))
}

/// GET /hc
pub async fn health_detail(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "Healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "service": state.config.service_name,
        "checks": {
            "self": "Healthy"
        }
    }))
}

/// GET /liveness
pub async fn liveness() -> impl IntoResponse {
    Json(json!({ "status": "Healthy" }))
}
