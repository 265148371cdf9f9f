use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::classifier::DegradedReason;
use crate::encoding;
use crate::helper::Label;
use crate::llm::GenerativeModel;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    /// Model text, or the profile fallback when degraded
    pub output: String,
    pub label: Option<Label>,
    pub degraded: bool,
    pub reason: Option<DegradedReason>,
    /// `output` as the oracle host would return it
    pub encoded: String,
    pub profile: String,
    pub classified_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub profile: String,
    pub model: String,
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Custom error type that implements IntoResponse
pub enum ApiError {
    ProviderError(String),
    InvalidInput(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ProviderError(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

/// POST /api/classify
/// Classifies one piece of text with the configured profile
pub async fn classify<M: GenerativeModel + 'static>(
    State(state): State<ApiState<M>>,
    Json(payload): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let text = match payload.text {
        Some(text) if !text.is_empty() => text,
        _ => {
            return Err(ApiError::InvalidInput(
                "Field 'text' must be a non-empty string".to_string(),
            ))
        }
    };

    let classification = state
        .classifier
        .classify(&text)
        .await
        .map_err(|e| ApiError::ProviderError(e.to_string()))?;

    let output = classification.output().to_string();
    info!("api classify -> {}", output.trim());

    Ok(Json(ClassifyResponse {
        encoded: encoding::to_hex(&encoding::encode_string(&output)),
        label: classification.label(),
        degraded: classification.is_degraded(),
        reason: classification.reason().cloned(),
        profile: state.classifier.profile().name.clone(),
        classified_at: Utc::now(),
        output,
    }))
}

/// GET /api/health
pub async fn health<M: GenerativeModel + 'static>(
    State(state): State<ApiState<M>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        profile: state.classifier.profile().name.clone(),
        model: state.classifier.model_id().to_string(),
    })
}
