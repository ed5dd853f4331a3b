//! 분석 서비스의 에러 타입.
//!
//! 이 모듈은 서비스 전반에서 사용되는 공통 에러 타입을 정의합니다.
//! 각 레이어(analytics, ai, data)는 자체 에러 타입을 가지며,
//! 경계를 넘을 때 이 타입으로 수렴합니다.

use thiserror::Error;

/// 핵심 분석 서비스 에러.
#[derive(Debug, Error)]
pub enum PulseError {
    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),

    /// 캔들 데이터 부족 (사용자가 교정 가능한 클라이언트 에러)
    #[error("Insufficient data: need at least {required} candles, got {provided}")]
    InsufficientData { required: usize, provided: usize },

    /// AI 모델 응답 불량 (fallback 소진 후 서버 에러로 표면화)
    #[error("Model response error: {0}")]
    ModelResponse(String),

    /// 인바운드 요청/기사 스키마 불일치
    #[error("Validation error: {0}")]
    Validation(String),

    /// 스토리지/큐 연결 불가
    #[error("Upstream connectivity error: {0}")]
    UpstreamConnectivity(String),

    /// 네트워크 에러
    #[error("Network error: {0}")]
    Network(String),

    /// 직렬화 에러
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 내부 에러
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 분석 서비스 작업을 위한 Result 타입.
pub type PulseResult<T> = Result<T, PulseError>;

impl PulseError {
    /// 클라이언트 측에서 교정 가능한 에러인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PulseError::InsufficientData { .. } | PulseError::Validation(_)
        )
    }

    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PulseError::Network(_) | PulseError::UpstreamConnectivity(_)
        )
    }
}

impl From<serde_json::Error> for PulseError {
    fn from(err: serde_json::Error) -> Self {
        PulseError::Serialization(err.to_string())
    }
}
