//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 전역 가변 싱글턴 대신, 프로세스 시작 시 한 번 구성되어 핸들러에
//! 명시적으로 주입되는 서비스 컨텍스트 객체입니다.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use std::sync::Arc;

use pulse_ai::{PricePredictor, SentimentAnalyzer};
use pulse_core::config::PredictionConfig;
use pulse_data::{CandleRepository, SentimentRepository};

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 풀 (헬스 체크용)
    pub db_pool: Option<PgPool>,

    /// 캔들 저장소
    pub candles: Option<Arc<CandleRepository>>,

    /// 감성 레코드 저장소
    pub sentiments: Option<Arc<SentimentRepository>>,

    /// 감성 추출기 — AI 키가 없으면 None (해당 엔드포인트는 503)
    pub analyzer: Option<Arc<SentimentAnalyzer>>,

    /// 가격 예측기 — AI 키가 없으면 None (해당 엔드포인트는 503)
    pub predictor: Option<Arc<PricePredictor>>,

    /// 뉴스 큐 컨슈머 기동 여부
    pub queue_enabled: bool,

    /// 예측 파이프라인 설정
    pub prediction: PredictionConfig,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: DateTime<Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(
        db_pool: PgPool,
        candles: Arc<CandleRepository>,
        sentiments: Arc<SentimentRepository>,
        analyzer: Option<Arc<SentimentAnalyzer>>,
        predictor: Option<Arc<PricePredictor>>,
        queue_enabled: bool,
        prediction: PredictionConfig,
    ) -> Self {
        Self {
            db_pool: Some(db_pool),
            candles: Some(candles),
            sentiments: Some(sentiments),
            analyzer,
            predictor,
            queue_enabled,
            prediction,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 상태를 확인합니다.
    pub async fn is_db_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
            None => false,
        }
    }

    /// 서버 업타임(초)을 반환합니다.
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// 의존성 없는 테스트용 상태를 생성합니다.
///
/// 스토리지/AI가 모두 미설정인 degraded 상태이며, 라우트 테스트에서
/// 503 경로와 헬스 응답 형태를 검증하는 데 사용됩니다.
pub fn create_test_state() -> AppState {
    AppState {
        db_pool: None,
        candles: None,
        sentiments: None,
        analyzer: None,
        predictor: None,
        queue_enabled: false,
        prediction: PredictionConfig::default(),
        started_at: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
