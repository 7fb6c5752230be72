use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::AppState;

/// GET /azure/test
///
/// Connectivity probe. The operation folds failures into its payload, so
/// this handler only chooses the status code: 200 when connected, 500
/// otherwise, with the payload returned either way.
pub async fn test_azure_connection(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.graph.test_connection().await;
    let code = if status.is_connected() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (code, Json(status))
}
