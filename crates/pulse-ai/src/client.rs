//! Gemini 모델 클라이언트.
//!
//! `generateContent` REST 엔드포인트를 사용하여 생성형 모델을 호출합니다.
//! 호출은 불투명한 함수로 취급됩니다: 텍스트+설정 → 텍스트, 실패 가능,
//! 지연 존재, 비결정적. 모든 호출에 유한한 데드라인이 적용되므로 멈춘
//! 업스트림이 호출자를 붙잡아 둘 수 없습니다.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::AiError;
use pulse_core::config::AiConfig;

/// 기본 API 엔드포인트.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// 모델 호출 요청.
///
/// 시스템 지시문은 호출 종류별로 고정 문자열이며(`prompts` 모듈),
/// 응답은 항상 JSON 전용으로 요청합니다.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// 고정 시스템 지시문
    pub system_instruction: String,
    /// 사용자 콘텐츠
    pub user_content: String,
    /// 샘플링 온도
    pub temperature: f64,
    /// 출력 토큰 상한 (없으면 제공자 기본값)
    pub max_output_tokens: Option<u32>,
}

/// Gemini REST 클라이언트.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// 설정으로 새 클라이언트를 생성합니다.
    pub fn new(config: &AiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: config.timeout(),
        }
    }

    /// 베이스 URL을 교체합니다 (테스트용 mock 서버 주입 지점).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 모델을 호출하고 원시 응답 텍스트를 반환합니다.
    ///
    /// # Errors
    ///
    /// - `AiError::Timeout`: 데드라인 초과
    /// - `AiError::Network`: 연결/전송 실패
    /// - `AiError::Api`: 제공자가 비정상 상태 코드를 반환
    /// - `AiError::InvalidResponse`: 응답 봉투에 후보 텍스트가 없음
    pub async fn generate(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<String, AiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let body = GenerateContentBody {
            system_instruction: Content {
                parts: vec![Part {
                    text: request.system_instruction.clone(),
                }],
            },
            contents: vec![Content {
                parts: vec![Part {
                    text: request.user_content.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
                response_mime_type: "application/json".to_string(),
            },
        };

        debug!(model = %model, "Calling generative model");

        let send = async {
            let response = self
                .http
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| AiError::Network(e.to_string()))?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| AiError::Network(e.to_string()))?;

            if !status.is_success() {
                return Err(AiError::Api {
                    status: status.as_u16(),
                    message: truncate(&text, 200),
                });
            }

            extract_candidate_text(&text)
        };

        tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| AiError::Timeout(self.timeout.as_secs()))?
    }
}

/// 응답 봉투에서 첫 후보의 텍스트를 꺼냅니다.
fn extract_candidate_text(raw: &str) -> Result<String, AiError> {
    let envelope: GenerateContentResponse = serde_json::from_str(raw)
        .map_err(|e| AiError::InvalidResponse(format!("malformed response envelope: {}", e)))?;

    envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| AiError::InvalidResponse("response contains no candidate text".to_string()))
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}

// ==================== Wire 타입 ====================

#[derive(Debug, Serialize)]
struct GenerateContentBody {
    #[serde(rename = "system_instruction")]
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}
