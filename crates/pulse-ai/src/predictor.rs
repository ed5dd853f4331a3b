//! 가격 방향 예측기.
//!
//! 지표 엔진과 감성 집계기를 오케스트레이션하여 예측 프롬프트를
//! 만들고, primary/fallback 2단계 시도로 모델을 호출한 뒤 구조화된
//! 결과를 검증합니다.
//!
//! 재시도 정책: 문서화된 fallback 한 번이 전부입니다. 예측 결과는
//! 캐시하지 않으며 신선도 정책은 호출자의 몫입니다.

use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{GeminiClient, GenerationRequest};
use crate::error::AiError;
use crate::prompts::{build_prediction_prompt, PREDICTION_SYSTEM_INSTRUCTION};
use pulse_analytics::indicators::{IndicatorEngine, IndicatorError};
use pulse_analytics::sentiment::SentimentAggregator;
use pulse_core::domain::{Candle, PricePrediction, SentimentRecord};
use pulse_core::types::Symbol;

/// 예측용 샘플링 온도.
const PREDICTION_TEMPERATURE: f64 = 0.3;

/// 예측 응답 출력 토큰 상한.
const PREDICTION_MAX_TOKENS: u32 = 800;

/// 예측 파이프라인 에러.
#[derive(Debug, Error)]
pub enum PredictError {
    /// 지표 계산 실패 (캔들 부족 포함)
    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    /// 모델 호출/응답 실패
    #[error(transparent)]
    Model(#[from] AiError),
}

/// 어떤 모델이 응답했는지 기록하는 시도 결과.
///
/// fallback 제어 흐름을 중첩 예외 처리가 아닌 명시적 2단계 시퀀스로
/// 모델링하기 위한 타입입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelAttempt {
    /// primary 모델이 응답
    Primary,
    /// primary 실패 후 fallback 모델이 응답
    Fallback,
}

/// 성공한 시도의 산출물.
#[derive(Debug)]
struct AttemptOutcome {
    text: String,
    attempt: ModelAttempt,
}

/// 모델이 반환해야 하는 예측 스키마.
///
/// `prediction` / `confidence` / `reasoning`은 필수이며,
/// 요인 목록은 없으면 빈 시퀀스로 처리합니다.
#[derive(Debug, serde::Deserialize)]
struct RawPrediction {
    prediction: pulse_core::domain::PredictedDirection,
    confidence: f64,
    reasoning: String,
    #[serde(default)]
    key_factors: Vec<String>,
    #[serde(default)]
    risk_factors: Vec<String>,
}

/// 가격 방향 예측기.
pub struct PricePredictor {
    client: Arc<GeminiClient>,
    engine: IndicatorEngine,
    aggregator: SentimentAggregator,
    primary_model: String,
    fallback_model: String,
}

impl PricePredictor {
    /// 새 예측기를 생성합니다.
    pub fn new(
        client: Arc<GeminiClient>,
        primary_model: impl Into<String>,
        fallback_model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            engine: IndicatorEngine::new(),
            aggregator: SentimentAggregator::new(),
            primary_model: primary_model.into(),
            fallback_model: fallback_model.into(),
        }
    }

    /// 가격 방향 예측을 생성합니다.
    ///
    /// # 인자
    /// * `symbol` - 거래 심볼
    /// * `candles` - 캔들 시퀀스 (oldest-first, 100개 이상 권장)
    /// * `sentiments` - 최근 감성 레코드 (newest-first)
    ///
    /// # Errors
    ///
    /// - `PredictError::Indicator`: 캔들이 50개 미만
    /// - `PredictError::Model`: primary와 fallback 모두 실패했거나
    ///   응답이 파싱/검증을 통과하지 못함
    pub async fn predict(
        &self,
        symbol: &Symbol,
        candles: &[Candle],
        sentiments: &[SentimentRecord],
    ) -> Result<PricePrediction, PredictError> {
        info!(
            symbol = %symbol,
            candles = candles.len(),
            sentiments = sentiments.len(),
            "Generating price prediction"
        );

        // 1. 기술적 지표
        let technical = self.engine.compute(candles)?;
        info!(rsi = %technical.rsi, macd = %technical.macd_signal, "Technical indicators computed");

        // 2. 감성 집계
        let sentiment = self.aggregator.aggregate(sentiments, Utc::now());
        info!(
            overall = %sentiment.overall_sentiment,
            average = sentiment.average_score,
            "Sentiment aggregated"
        );

        // 3. 프롬프트 구성
        let prompt = build_prediction_prompt(symbol, &technical, &sentiment);

        // 4. primary → fallback 2단계 시도
        let request = GenerationRequest {
            system_instruction: PREDICTION_SYSTEM_INSTRUCTION.to_string(),
            user_content: prompt,
            temperature: PREDICTION_TEMPERATURE,
            max_output_tokens: Some(PREDICTION_MAX_TOKENS),
        };
        let outcome = self.generate_with_fallback(&request).await?;
        if outcome.attempt == ModelAttempt::Fallback {
            info!(model = %self.fallback_model, "Prediction answered by fallback model");
        }

        // 5. 파싱/검증 (여기서는 더 이상 재시도하지 않음)
        let raw: RawPrediction = serde_json::from_str(&outcome.text).map_err(|e| {
            AiError::InvalidResponse(format!("invalid prediction JSON from model: {}", e))
        })?;

        // 6. 완료 시각 스탬프
        Ok(PricePrediction {
            symbol: symbol.clone(),
            prediction: raw.prediction,
            confidence: raw.confidence.clamp(0.0, 1.0),
            reasoning: raw.reasoning,
            key_factors: raw.key_factors,
            risk_factors: raw.risk_factors,
            technical_indicators: technical,
            sentiment_summary: sentiment,
            predicted_at: Utc::now(),
        })
    }

    /// primary를 호출하고, 실패하면 정확히 한 번 fallback을 호출합니다.
    ///
    /// 타임아웃, 제공자 에러, 봉투 해석 실패 등 모든 실패가 fallback
    /// 트리거입니다. 둘 다 실패하면 두 원인을 담은
    /// `AiError::AllModelsFailed`를 반환합니다.
    async fn generate_with_fallback(
        &self,
        request: &GenerationRequest,
    ) -> Result<AttemptOutcome, AiError> {
        let primary_err = match self.client.generate(&self.primary_model, request).await {
            Ok(text) => {
                return Ok(AttemptOutcome {
                    text,
                    attempt: ModelAttempt::Primary,
                })
            }
            Err(e) => e,
        };

        warn!(
            model = %self.primary_model,
            error = %primary_err,
            "Primary model failed, trying fallback model"
        );

        match self.client.generate(&self.fallback_model, request).await {
            Ok(text) => Ok(AttemptOutcome {
                text,
                attempt: ModelAttempt::Fallback,
            }),
            Err(fallback_err) => Err(AiError::AllModelsFailed {
                primary: primary_err.to_string(),
                fallback: fallback_err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pulse_core::config::AiConfig;
    use pulse_core::domain::{PredictedDirection, SentimentCategory};
    use pulse_core::types::Interval;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn test_config() -> AiConfig {
        AiConfig {
            api_key: "test-key".to_string(),
            primary_model: "primary-model".to_string(),
            fallback_model: "fallback-model".to_string(),
            timeout_secs: 5,
        }
    }

    fn predictor_for(server: &mockito::Server) -> PricePredictor {
        let client = Arc::new(GeminiClient::new(&test_config()).with_base_url(server.url()));
        PricePredictor::new(client, "primary-model", "fallback-model")
    }

    fn sample_candles(count: usize) -> Vec<Candle> {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                let close = Decimal::from(100 + i as i64);
                Candle::new(
                    Symbol::new("BTCUSDT"),
                    Interval::H1,
                    base + Duration::hours(i as i64),
                    close - dec!(1),
                    close + dec!(1),
                    close - dec!(2),
                    close,
                    dec!(1000),
                )
            })
            .collect()
    }

    fn sample_sentiments() -> Vec<SentimentRecord> {
        let now = Utc::now();
        vec![SentimentRecord {
            id: Uuid::new_v4(),
            news_id: Uuid::new_v4(),
            symbol: Symbol::new("BTCUSDT"),
            category: SentimentCategory::Bullish,
            score: 0.6,
            rationale: "ETF inflows".to_string(),
            analyzed_at: now - Duration::hours(2),
        }]
    }

    fn prediction_envelope(confidence: f64) -> String {
        let body = serde_json::json!({
            "prediction": "UP",
            "confidence": confidence,
            "reasoning": "Momentum and sentiment aligned",
            "key_factors": ["RSI overbought", "MACD bullish"],
            "risk_factors": ["Volume normal"]
        });
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": body.to_string()}]}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_predict_happy_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/primary-model:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(prediction_envelope(0.72))
            .expect(1)
            .create_async()
            .await;

        let predictor = predictor_for(&server);
        let prediction = predictor
            .predict(&Symbol::new("BTCUSDT"), &sample_candles(100), &sample_sentiments())
            .await
            .unwrap();

        assert_eq!(prediction.prediction, PredictedDirection::Up);
        assert_eq!(prediction.confidence, 0.72);
        assert_eq!(prediction.key_factors.len(), 2);
        assert_eq!(prediction.sentiment_summary.articles_count, 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back_with_exactly_two_calls() {
        let mut server = mockito::Server::new_async().await;
        let primary = server
            .mock("POST", "/models/primary-model:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .with_body("temporarily unavailable")
            .expect(1)
            .create_async()
            .await;
        let fallback = server
            .mock("POST", "/models/fallback-model:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(prediction_envelope(0.55))
            .expect(1)
            .create_async()
            .await;

        let predictor = predictor_for(&server);
        let prediction = predictor
            .predict(&Symbol::new("BTCUSDT"), &sample_candles(100), &sample_sentiments())
            .await
            .unwrap();

        assert_eq!(prediction.confidence, 0.55);
        primary.assert_async().await;
        fallback.assert_async().await;
    }

    #[tokio::test]
    async fn test_both_models_failing_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/primary-model:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .expect(1)
            .create_async()
            .await;
        server
            .mock("POST", "/models/fallback-model:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let predictor = predictor_for(&server);
        let result = predictor
            .predict(&Symbol::new("BTCUSDT"), &sample_candles(100), &sample_sentiments())
            .await;

        assert!(matches!(
            result,
            Err(PredictError::Model(AiError::AllModelsFailed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_is_clamped() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/primary-model:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(prediction_envelope(1.7))
            .create_async()
            .await;

        let predictor = predictor_for(&server);
        let prediction = predictor
            .predict(&Symbol::new("BTCUSDT"), &sample_candles(100), &sample_sentiments())
            .await
            .unwrap();

        assert_eq!(prediction.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_missing_required_keys_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({"prediction": "UP"});
        let envelope = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": body.to_string()}]}}]
        });
        server
            .mock("POST", "/models/primary-model:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(envelope.to_string())
            .create_async()
            .await;

        let predictor = predictor_for(&server);
        let result = predictor
            .predict(&Symbol::new("BTCUSDT"), &sample_candles(100), &sample_sentiments())
            .await;

        assert!(matches!(
            result,
            Err(PredictError::Model(AiError::InvalidResponse(_)))
        ));
    }

    #[tokio::test]
    async fn test_factor_lists_default_to_empty() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "prediction": "NEUTRAL",
            "confidence": 0.4,
            "reasoning": "Mixed signals"
        });
        let envelope = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": body.to_string()}]}}]
        });
        server
            .mock("POST", "/models/primary-model:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(envelope.to_string())
            .create_async()
            .await;

        let predictor = predictor_for(&server);
        let prediction = predictor
            .predict(&Symbol::new("BTCUSDT"), &sample_candles(100), &sample_sentiments())
            .await
            .unwrap();

        assert!(prediction.key_factors.is_empty());
        assert!(prediction.risk_factors.is_empty());
    }

    #[tokio::test]
    async fn test_insufficient_candles_never_calls_model() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let predictor = predictor_for(&server);
        let result = predictor
            .predict(&Symbol::new("BTCUSDT"), &sample_candles(10), &sample_sentiments())
            .await;

        assert!(matches!(
            result,
            Err(PredictError::Indicator(IndicatorError::InsufficientData {
                required: 50,
                provided: 10
            }))
        ));
        mock.assert_async().await;
    }
}
