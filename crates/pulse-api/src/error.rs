//! API 에러 응답 및 상태 코드 매핑.
//!
//! 내부 에러는 요약된 메시지로만 표면화됩니다. 모델의 원시 출력이나
//! 내부 덤프가 응답에 실리는 일은 없습니다.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use pulse_ai::{AiError, PredictError};
use pulse_analytics::IndicatorError;
use pulse_core::domain::StoreError;

/// API 에러 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// 에러 코드
    pub code: String,
    /// 에러 메시지
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// 에러 응답 타입 별칭.
pub type ErrorResponse = (StatusCode, Json<ApiError>);

/// AiError를 HTTP 응답으로 변환 (감성 추출 경로).
pub fn ai_error_to_response(err: AiError) -> ErrorResponse {
    match &err {
        // 모델 출력 불량은 클라이언트가 볼 수 있는 검증 에러로 표면화
        AiError::InvalidResponse(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiError::new("INVALID_MODEL_RESPONSE", err.to_string())),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(
                "ANALYSIS_FAILED",
                "Analysis failed. Please try again.",
            )),
        ),
    }
}

/// PredictError를 HTTP 응답으로 변환 (예측 경로).
pub fn predict_error_to_response(err: PredictError) -> ErrorResponse {
    match &err {
        PredictError::Indicator(IndicatorError::InsufficientData { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("INSUFFICIENT_DATA", err.to_string())),
        ),
        PredictError::Indicator(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new("INDICATOR_ERROR", err.to_string())),
        ),
        PredictError::Model(AiError::InvalidResponse(_)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiError::new("INVALID_MODEL_RESPONSE", err.to_string())),
        ),
        PredictError::Model(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(
                "PREDICTION_FAILED",
                "Prediction failed. Please try again.",
            )),
        ),
    }
}

/// StoreError를 HTTP 응답으로 변환.
pub fn store_error_to_response(err: StoreError) -> ErrorResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new("STORAGE_ERROR", err.to_string())),
    )
}

/// 503 Service Unavailable 응답.
pub fn service_unavailable(code: &str, message: &str) -> ErrorResponse {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ApiError::new(code, message)),
    )
}
