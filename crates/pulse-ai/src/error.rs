//! AI 레이어 에러 타입.

use thiserror::Error;

/// 생성형 모델 호출/해석 에러.
#[derive(Debug, Error)]
pub enum AiError {
    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    Network(String),

    /// 호출 데드라인 초과
    #[error("Model call timed out after {0}s")]
    Timeout(u64),

    /// 모델 제공자 API 에러
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// 모델 응답이 JSON으로 파싱되지 않거나 스키마/범위를 벗어남
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    /// primary와 fallback 모두 실패
    #[error("Both models failed: primary ({primary}), fallback ({fallback})")]
    AllModelsFailed { primary: String, fallback: String },
}

impl AiError {
    /// 응답 파싱/검증 단계의 에러인지 확인합니다.
    ///
    /// 파싱 에러는 클라이언트 입력 문제가 아니라 모델 출력 문제이므로
    /// fallback 재시도 대상이 아닙니다.
    pub fn is_response_error(&self) -> bool {
        matches!(self, AiError::InvalidResponse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_models_failed_message() {
        let err = AiError::AllModelsFailed {
            primary: "timeout".to_string(),
            fallback: "HTTP 500".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("timeout"));
        assert!(msg.contains("HTTP 500"));
    }

    #[test]
    fn test_response_error_classification() {
        assert!(AiError::InvalidResponse("not json".to_string()).is_response_error());
        assert!(!AiError::Timeout(30).is_response_error());
    }
}
