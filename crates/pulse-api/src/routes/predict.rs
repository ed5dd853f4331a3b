//! 가격 예측 endpoint.
//!
//! POST /api/predict/price
//!
//! - 200: 가격 방향 예측
//! - 400: 저장된 캔들이 50개 미만 (메시지에 최소 개수와 실제 개수 포함)
//! - 422: 요청 본문 검증 실패 또는 모델 출력 불량
//! - 500: 스토리지/모델 실패
//! - 503: 예측기 미초기화 (AI 키 미설정)

use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::error::{
    predict_error_to_response, service_unavailable, store_error_to_response, ErrorResponse,
};
use crate::state::AppState;
use pulse_core::domain::{CandleStore, PricePrediction, SentimentStore};
use pulse_core::types::{Interval, Symbol};

/// 예측 요청 본문.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// 거래 심볼 (대문자로 정규화됨)
    pub symbol: Symbol,
    /// 캔들 간격 (기본: 1h)
    #[serde(default = "default_interval")]
    pub interval: Interval,
}

fn default_interval() -> Interval {
    Interval::H1
}

/// 심볼의 가격 방향을 예측합니다.
pub async fn predict_price(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PricePrediction>, ErrorResponse> {
    let Some(predictor) = &state.predictor else {
        return Err(service_unavailable(
            "PREDICTOR_NOT_READY",
            "Price predictor is not initialized",
        ));
    };
    let (Some(candles_repo), Some(sentiments_repo)) = (&state.candles, &state.sentiments) else {
        return Err(service_unavailable(
            "STORAGE_NOT_READY",
            "Storage is not initialized",
        ));
    };

    info!(symbol = %request.symbol, interval = %request.interval, "Prediction requested");

    let candles = candles_repo
        .recent_candles(
            &request.symbol,
            request.interval,
            state.prediction.candle_limit,
        )
        .await
        .map_err(store_error_to_response)?;

    let window_start = Utc::now() - Duration::hours(state.prediction.sentiment_window_hours);
    let sentiments = sentiments_repo
        .sentiments_since(&request.symbol, window_start)
        .await
        .map_err(store_error_to_response)?;

    let prediction = predictor
        .predict(&request.symbol, &candles, &sentiments)
        .await
        .map_err(predict_error_to_response)?;

    info!(
        symbol = %prediction.symbol,
        direction = %prediction.prediction,
        confidence = prediction.confidence,
        "Prediction complete"
    );
    Ok(Json(prediction))
}
