//! 감성 분석 endpoint.
//!
//! POST /api/sentiment/analyze
//!
//! 기사 한 건을 받아 심볼별 감성 목록을 반환합니다.
//! - 200: 감성 목록
//! - 422: 요청 본문 검증 실패 또는 모델 출력 불량
//! - 500: 예기치 못한 실패 (요약 메시지만 노출)
//! - 503: 분석기 미초기화 (AI 키 미설정)

use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::info;

use crate::error::{ai_error_to_response, service_unavailable, ErrorResponse};
use crate::state::AppState;
use pulse_core::domain::{NewsArticle, SymbolSentiment};

/// 기사 한 건의 심볼 감성을 추출합니다.
pub async fn analyze_sentiment(
    State(state): State<Arc<AppState>>,
    Json(article): Json<NewsArticle>,
) -> Result<Json<Vec<SymbolSentiment>>, ErrorResponse> {
    let Some(analyzer) = &state.analyzer else {
        return Err(service_unavailable(
            "ANALYZER_NOT_READY",
            "Sentiment analyzer is not initialized",
        ));
    };

    info!(header = %article.header, "Analyzing sentiment for news article");

    let sentiments = analyzer
        .analyze(&article)
        .await
        .map_err(ai_error_to_response)?;

    info!(count = sentiments.len(), "Sentiment analysis complete");
    Ok(Json(sentiments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::post,
        Router,
    };
    use tower::ServiceExt;

    fn test_app() -> Router {
        Router::new()
            .route("/api/sentiment/analyze", post(analyze_sentiment))
            .with_state(Arc::new(create_test_state()))
    }

    fn article_body() -> String {
        serde_json::json!({
            "header": "Bitcoin ETF approved",
            "subheader": "Spot ETF begins trading",
            "content": "The SEC approved...",
            "url": "https://example.com/article",
            "crawled_at": "2025-06-01T09:30:00Z"
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_returns_503_when_analyzer_not_initialized() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/sentiment/analyze")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(article_body()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "ANALYZER_NOT_READY");
    }

    #[tokio::test]
    async fn test_model_garbage_surfaces_as_422_without_raw_text() {
        use pulse_ai::{GeminiClient, SentimentAnalyzer};
        use pulse_core::config::AiConfig;

        // 모델이 "not json"을 반환하는 상황
        let mut server = mockito::Server::new_async().await;
        let envelope = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "not json"}]}}]
        });
        server
            .mock("POST", "/models/test-model:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(envelope.to_string())
            .create_async()
            .await;

        let config = AiConfig {
            api_key: "test-key".to_string(),
            primary_model: "test-model".to_string(),
            fallback_model: "test-model".to_string(),
            timeout_secs: 5,
        };
        let client = Arc::new(GeminiClient::new(&config).with_base_url(server.url()));

        let mut state = create_test_state();
        state.analyzer = Some(Arc::new(SentimentAnalyzer::new(client, "test-model")));

        let app = Router::new()
            .route("/api/sentiment/analyze", post(analyze_sentiment))
            .with_state(Arc::new(state));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/sentiment/analyze")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(article_body()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_MODEL_RESPONSE");
        // 모델의 원시 출력이 아닌 요약된 파싱 에러만 노출된다
        assert!(error.message.contains("invalid JSON from model"));
    }

    #[tokio::test]
    async fn test_rejects_article_with_missing_fields() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/sentiment/analyze")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"header": "only a header"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
