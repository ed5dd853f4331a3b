//! API 라우트.

pub mod health;
pub mod predict;
pub mod sentiment;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/sentiment/analyze", post(sentiment::analyze_sentiment))
        .route("/api/predict/price", post(predict::predict_price))
        .with_state(state)
}
