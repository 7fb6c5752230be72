use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Graph API error: {code} - {message}")]
    Graph { code: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Group '{0}' already exists")]
    DuplicateGroup(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Config(msg) => AppError::ConfigError(anyhow::anyhow!(msg)),
            ServiceError::DuplicateGroup(name) => {
                AppError::BadRequest(anyhow::anyhow!("Group '{}' already exists", name))
            }
            other => AppError::InternalError(anyhow::Error::new(other)),
        }
    }
}
