use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned for any malformed `/classify` request
pub const INVALID_INPUT_MESSAGE: &str =
    "Invalid input, 'text' and 'location' fields are required.";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Client sent a malformed request
    #[error("{0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Training data missing, unreadable or unusable
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Model fitting failed
    #[error("Training error: {0}")]
    Training(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The fixed validation error for `/classify`
    pub fn invalid_input() -> Self {
        AppError::Validation(INVALID_INPUT_MESSAGE.to_string())
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_)
            | AppError::Dataset(_)
            | AppError::Training(_)
            | AppError::Io(_)
            | AppError::Csv(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Dataset(_) => "DATASET_ERROR",
            AppError::Training(_) => "TRAINING_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Csv(_) => "CSV_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(
                error_code = self.error_code(),
                status_code = status.as_u16(),
                message = %message,
                "Request error"
            );
        } else {
            tracing::debug!(
                error_code = self.error_code(),
                status_code = status.as_u16(),
                "Rejected request"
            );
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(_: validator::ValidationErrors) -> Self {
        AppError::invalid_input()
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<ndarray::ShapeError> for AppError {
    fn from(err: ndarray::ShapeError) -> Self {
        AppError::Internal(format!("Feature matrix shape mismatch: {}", err))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::invalid_input().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Dataset("missing".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::invalid_input().error_code(), "VALIDATION_ERROR");
        assert_eq!(
            AppError::Training("x".to_string()).error_code(),
            "TRAINING_ERROR"
        );
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        assert_eq!(AppError::invalid_input().to_string(), INVALID_INPUT_MESSAGE);
    }
}
