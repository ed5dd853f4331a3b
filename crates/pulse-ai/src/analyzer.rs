//! 심볼 감성 추출기.
//!
//! 뉴스 기사 한 건을 받아 모델을 정확히 한 번 호출하고, 응답을 엄격한
//! JSON으로 검증하여 심볼별 감성 목록을 반환합니다. 이 레이어는
//! 재시도하지 않습니다 — 재시도 여부는 호출자의 결정입니다.

use std::sync::Arc;
use tracing::{debug, info};

use crate::client::{GeminiClient, GenerationRequest};
use crate::error::AiError;
use crate::prompts::{build_news_text, SENTIMENT_SYSTEM_INSTRUCTION};
use pulse_core::domain::{NewsArticle, SymbolSentiment};

/// 감성 추출용 샘플링 온도.
const SENTIMENT_TEMPERATURE: f64 = 0.5;

/// 모델 응답 봉투 (symbols 리스트 스키마).
#[derive(Debug, serde::Deserialize)]
struct SentimentResponse {
    symbols: Vec<SymbolSentiment>,
}

/// 심볼 감성 추출기.
pub struct SentimentAnalyzer {
    client: Arc<GeminiClient>,
    model: String,
}

impl SentimentAnalyzer {
    /// 새 추출기를 생성합니다.
    pub fn new(client: Arc<GeminiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// 기사를 분석하여 심볼별 감성을 추출합니다.
    ///
    /// # Errors
    ///
    /// 응답이 JSON으로 파싱되지 않거나, 필수 필드가 없거나, 점수가
    /// [-1, 1] 범위를 벗어나면 `AiError::InvalidResponse`.
    /// 네트워크/제공자 실패는 해당 `AiError` 변형 그대로 전파됩니다.
    pub async fn analyze(&self, article: &NewsArticle) -> Result<Vec<SymbolSentiment>, AiError> {
        let request = GenerationRequest {
            system_instruction: SENTIMENT_SYSTEM_INSTRUCTION.to_string(),
            user_content: build_news_text(article),
            temperature: SENTIMENT_TEMPERATURE,
            max_output_tokens: None,
        };

        info!(header = %article.header, "Requesting sentiment extraction");
        let raw = self.client.generate(&self.model, &request).await?;
        debug!(bytes = raw.len(), "Received sentiment response");

        let sentiments = parse_sentiment_response(&raw)?;
        info!(count = sentiments.len(), "Sentiment extraction complete");

        Ok(sentiments)
    }
}

/// 원시 응답 텍스트를 검증된 감성 목록으로 파싱합니다.
///
/// 모델이 코드 펜스로 JSON을 감싸는 경우가 있어 펜스를 먼저 제거합니다.
/// 검증 실패는 모두 에러로 표면화되며 조용한 보정은 없습니다.
fn parse_sentiment_response(raw: &str) -> Result<Vec<SymbolSentiment>, AiError> {
    let cleaned = strip_code_fences(raw);

    let response: SentimentResponse = serde_json::from_str(cleaned)
        .map_err(|e| AiError::InvalidResponse(format!("invalid JSON from model: {}", e)))?;

    for sentiment in &response.symbols {
        if !sentiment.score_in_bounds() {
            return Err(AiError::InvalidResponse(format!(
                "score {} for {} is outside [-1, 1]",
                sentiment.score, sentiment.symbol
            )));
        }
    }

    Ok(response.symbols)
}

/// 선택적 마크다운 코드 펜스를 제거합니다.
fn strip_code_fences(raw: &str) -> &str {
    let mut cleaned = raw.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pulse_core::config::AiConfig;
    use pulse_core::domain::{ImpactType, SentimentCategory};

    fn sample_article() -> NewsArticle {
        NewsArticle {
            header: "Bitcoin ETF sees record inflows".to_string(),
            subheader: "Institutional demand grows".to_string(),
            content: "Spot Bitcoin ETFs recorded the largest daily inflow...".to_string(),
            url: "https://example.com/article".to_string(),
            crawled_at: Utc::now(),
        }
    }

    const VALID_BODY: &str = r#"{
        "symbols": [
            {
                "symbol": "BTCUSDT",
                "category": "Bullish",
                "score": 0.8,
                "impact_type": "direct",
                "rationale": "Record inflows signal strong buy pressure"
            }
        ]
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let sentiments = parse_sentiment_response(VALID_BODY).unwrap();
        assert_eq!(sentiments.len(), 1);
        assert_eq!(sentiments[0].symbol.as_str(), "BTCUSDT");
        assert_eq!(sentiments[0].category, SentimentCategory::Bullish);
        assert_eq!(sentiments[0].impact_type, ImpactType::Direct);
    }

    #[test]
    fn test_parse_strips_code_fences() {
        let fenced = format!("```json\n{}\n```", VALID_BODY);
        let sentiments = parse_sentiment_response(&fenced).unwrap();
        assert_eq!(sentiments.len(), 1);

        let bare_fence = format!("```\n{}\n```", VALID_BODY);
        assert_eq!(parse_sentiment_response(&bare_fence).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let result = parse_sentiment_response("not json");
        assert!(matches!(result, Err(AiError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let missing = r#"{"symbols": [{"symbol": "BTCUSDT", "score": 0.5}]}"#;
        let result = parse_sentiment_response(missing);
        assert!(matches!(result, Err(AiError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_rejects_out_of_bounds_score() {
        let out_of_bounds = r#"{
            "symbols": [
                {
                    "symbol": "BTCUSDT",
                    "category": "Bullish",
                    "score": 1.5,
                    "impact_type": "direct",
                    "rationale": "impossible score"
                }
            ]
        }"#;
        let result = parse_sentiment_response(out_of_bounds);
        assert!(matches!(result, Err(AiError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_empty_symbol_list_is_ok() {
        let empty = r#"{"symbols": []}"#;
        assert!(parse_sentiment_response(empty).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_with_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let envelope = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": VALID_BODY}]}}]
        });
        let mock = server
            .mock("POST", "/models/sentiment-model:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(envelope.to_string())
            .create_async()
            .await;

        let config = AiConfig {
            api_key: "test-key".to_string(),
            primary_model: "sentiment-model".to_string(),
            fallback_model: "fallback-model".to_string(),
            timeout_secs: 5,
        };
        let client = Arc::new(GeminiClient::new(&config).with_base_url(server.url()));
        let analyzer = SentimentAnalyzer::new(client, "sentiment-model");

        let sentiments = analyzer.analyze(&sample_article()).await.unwrap();
        assert_eq!(sentiments.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_analyze_surfaces_model_garbage_as_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let envelope = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "not json"}]}}]
        });
        server
            .mock("POST", "/models/sentiment-model:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(envelope.to_string())
            .create_async()
            .await;

        let config = AiConfig {
            api_key: "test-key".to_string(),
            primary_model: "sentiment-model".to_string(),
            fallback_model: "fallback-model".to_string(),
            timeout_secs: 5,
        };
        let client = Arc::new(GeminiClient::new(&config).with_base_url(server.url()));
        let analyzer = SentimentAnalyzer::new(client, "sentiment-model");

        let result = analyzer.analyze(&sample_article()).await;
        assert!(matches!(result, Err(AiError::InvalidResponse(_))));
    }
}
