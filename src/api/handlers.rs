use crate::api::AppState;
use crate::config::StrategyKind;
use crate::error::{AppError, Result};
use crate::ml::ModelMetadata;
use crate::models::Classification;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        strategy: state.classifier.metadata().strategy,
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub strategy: StrategyKind,
    pub uptime_seconds: u64,
}

/// Classify a complaint into a department and severity tier
pub async fn classify(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<Classification>> {
    // Any body that is not a JSON object with string fields gets the same 400
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected classify body: {}", rejection);
        AppError::invalid_input()
    })?;
    request.validate()?;

    let (Some(text), Some(location)) = (request.text, request.location) else {
        return Err(AppError::invalid_input());
    };

    let result = state.classifier.classify(&text, &location)?;

    tracing::info!(
        department = %result.department,
        severity = %result.severity,
        "Complaint classified"
    );

    Ok(Json(result))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClassifyRequest {
    #[validate(required, length(min = 1))]
    pub text: Option<String>,
    #[validate(required)]
    pub location: Option<String>,
}

/// Describe the model serving classifications
pub async fn model_info(State(state): State<AppState>) -> Json<ModelMetadata> {
    Json(state.classifier.metadata().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_requires_both_fields() {
        let missing_location = ClassifyRequest {
            text: Some("no water".to_string()),
            location: None,
        };
        assert!(missing_location.validate().is_err());

        let missing_text = ClassifyRequest {
            text: None,
            location: Some("Pune".to_string()),
        };
        assert!(missing_text.validate().is_err());
    }

    #[test]
    fn test_request_rejects_empty_text() {
        let request = ClassifyRequest {
            text: Some(String::new()),
            location: Some("Pune".to_string()),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_allows_empty_location() {
        let request = ClassifyRequest {
            text: Some("no water".to_string()),
            location: Some(String::new()),
        };
        assert!(request.validate().is_ok());
    }
}
