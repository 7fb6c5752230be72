use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{message}")]
    FieldValidation { field: String, message: String },

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Bad Gateway: {0}")]
    BadGateway(String),

    #[error("Service Unavailable")]
    ServiceUnavailable,

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// Pulls the first offending field (alphabetically, for determinism) and its
/// message out of a `validator` error set.
fn first_validation_failure(errors: &validator::ValidationErrors) -> (String, String) {
    let mut failures: Vec<(&str, String)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let message = field_errors
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for '{field}'"));
            (field, message)
        })
        .collect();
    failures.sort();

    match failures.into_iter().next() {
        Some((field, message)) => (field.to_string(), message),
        None => ("unknown".to_string(), errors.to_string()),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(rename = "propertyName", skip_serializing_if = "Option::is_none")]
            property_name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let (status, error_message, property_name, details) = match self {
            AppError::ValidationError(errors) => {
                let (field, message) = first_validation_failure(&errors);
                (StatusCode::BAD_REQUEST, message, Some(field), None)
            }
            AppError::FieldValidation { field, message } => {
                (StatusCode::BAD_REQUEST, message, Some(field), None)
            }
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string(), None, None),
            AppError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string(), None, None),
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
                Some(err.to_string()),
            ),
            AppError::BadGateway(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Bad Gateway: {msg}"),
                None,
                None,
            ),
            AppError::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service unavailable".to_string(),
                None,
                None,
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                None,
                Some(err.to_string()),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
                property_name,
                details,
            }),
        )
            .into_response()
    }
}
