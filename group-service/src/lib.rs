pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use axum::{
    Router,
    http::StatusCode,
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post},
};
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::GroupConfig;
use crate::services::GraphService;

/// Shared application state: immutable config plus the directory client,
/// both constructed once at startup and injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: GroupConfig,
    pub graph: GraphService,
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.common.cors_origins);

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/hc", get(handlers::health::health_detail))
        .route("/liveness", get(handlers::health::liveness))
        .route("/metrics", get(metrics_endpoint))
        .route("/azure/test", get(handlers::azure::test_azure_connection))
        .route("/groups", post(handlers::groups::create_group))
        .route("/groups/search", get(handlers::groups::search_groups))
        .route(
            "/groups/:groupId/members",
            get(handlers::groups::get_group_members).post(handlers::groups::add_group_member),
        )
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        services::metrics::get_metrics(),
    )
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(
            allowed_origins
                .iter()
                .filter_map(|o| match o.parse::<axum::http::HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                        None
                    }
                })
                .collect::<Vec<axum::http::HeaderValue>>(),
        )
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
        .allow_credentials(true)
}
