use group_service::config::GroupConfig;
use group_service::services::metrics::init_metrics;
use group_service::startup::Application;
use service_core::observability::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Fail fast on missing credentials before anything listens.
    let config = GroupConfig::from_env()?;

    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing(&config.service_name, &config.log_level, otlp_endpoint.as_deref());

    init_metrics();

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting group manager service"
    );

    let app = Application::build(config).await?;
    tracing::info!(port = app.port(), "HTTP server listening");
    app.run_until_stopped().await?;

    Ok(())
}
