use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid webhook signature: {0}")]
    InvalidSignature(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Malformed checkout metadata: {0}")]
    MalformedMetadata(String),

    #[error("Order materialization failed: {0}")]
    MaterializationFailure(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            AppError::InvalidSignature(_)
            | AppError::ConfigError(_)
            | AppError::MalformedMetadata(_)
            | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            AppError::InvalidSignature(msg) => {
                log::warn!("Invalid webhook signature: {msg}");
                ("INVALID_SIGNATURE", msg.clone())
            }
            AppError::ConfigError(msg) => {
                log::error!("Config error: {msg}");
                ("CONFIG_ERROR", msg.clone())
            }
            AppError::MalformedMetadata(msg) => {
                log::warn!("Malformed checkout metadata: {msg}");
                ("MALFORMED_METADATA", msg.clone())
            }
            AppError::MaterializationFailure(msg) => {
                log::error!("Order materialization failed: {msg}");
                ("MATERIALIZATION_FAILURE", msg.clone())
            }
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                ("VALIDATION_ERROR", msg.clone())
            }
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::ExternalApiError(msg) => {
                log::error!("External API error: {msg}");
                ("EXTERNAL_API_ERROR", msg.clone())
            }
            _ => {
                log::error!("Internal error: {self}");
                ("INTERNAL_ERROR", "Internal server error".to_string())
            }
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn signature_and_config_failures_are_client_errors() {
        let e = AppError::InvalidSignature("bad v1".to_string());
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        let e = AppError::ConfigError("webhook secret is not set".to_string());
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        let e = AppError::MalformedMetadata("missing orderNumber".to_string());
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn materialization_failure_is_a_server_error() {
        let e = AppError::MaterializationFailure("connection refused".to_string());
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
