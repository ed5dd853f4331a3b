//! 분석 서비스 API 서버.
//!
//! Axum 기반 REST 서버를 시작하고, 뉴스 큐 컨슈머를 백그라운드
//! 태스크로 기동합니다. 스토리지 연결 실패는 치명적이지만, 큐 연결
//! 실패는 경고 후 계속 진행합니다 — 인제스천이 꺼져도 HTTP 표면은
//! 사용 가능해야 합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use pulse_ai::{GeminiClient, PricePredictor, SentimentAnalyzer};
use pulse_api::routes::create_api_router;
use pulse_api::state::AppState;
use pulse_core::config::AppConfig;
use pulse_core::logging::init_logging_from_env;
use pulse_data::{
    connect_database, CandleRepository, NewsQueue, NewsRepository, SentimentRepository,
};
use pulse_ingest::{run_consumer, IngestionCoordinator};

/// HTTP 요청 타임아웃.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging_from_env().map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    info!("Starting analysis service...");

    let config = AppConfig::from_env().context("failed to load configuration")?;

    // 스토리지 연결 — 필수 의존성, 실패 시 기동 중단
    let pool = connect_database(&config.database_url)
        .await
        .context("cannot continue without database connection")?;

    let news_repo = Arc::new(NewsRepository::new(pool.clone()));
    let sentiment_repo = Arc::new(SentimentRepository::new(pool.clone()));
    let candle_repo = Arc::new(CandleRepository::new(pool.clone()));

    // AI 클라이언트 — 키가 없으면 분석/예측 엔드포인트가 503을 반환
    let (analyzer, predictor) = match &config.ai {
        Some(ai) => {
            let client = Arc::new(GeminiClient::new(ai));
            info!(model = %ai.primary_model, fallback = %ai.fallback_model, "AI client initialized");
            (
                Some(Arc::new(SentimentAnalyzer::new(
                    client.clone(),
                    &ai.primary_model,
                ))),
                Some(Arc::new(PricePredictor::new(
                    client,
                    &ai.primary_model,
                    &ai.fallback_model,
                ))),
            )
        }
        None => {
            warn!("GEMINI_API_KEY not set, sentiment analysis and prediction are disabled");
            (None, None)
        }
    };

    // 뉴스 큐 컨슈머 — 실패해도 HTTP 표면은 유지 (인제스천만 축소)
    let shutdown = CancellationToken::new();
    let queue_enabled =
        start_news_consumer(&config, &news_repo, &sentiment_repo, &analyzer, &shutdown).await;

    let state = Arc::new(AppState::new(
        pool,
        candle_repo,
        sentiment_repo.clone(),
        analyzer,
        predictor,
        queue_enabled,
        config.prediction.clone(),
    ));

    let app = create_api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address configuration")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!("Server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown.clone()))
        .await
        .context("server error")?;

    shutdown.cancel();
    info!("Analysis service stopped");
    Ok(())
}

/// 뉴스 큐 컨슈머를 기동합니다.
///
/// 큐 미설정, AI 미설정, 연결 실패 어느 경우에도 프로세스는 계속
/// 진행됩니다. 기동에 성공했을 때만 true를 반환합니다.
async fn start_news_consumer(
    config: &AppConfig,
    news_repo: &Arc<NewsRepository>,
    sentiment_repo: &Arc<SentimentRepository>,
    analyzer: &Option<Arc<SentimentAnalyzer>>,
    shutdown: &CancellationToken,
) -> bool {
    let Some(queue_config) = &config.queue else {
        info!("REDIS_URL not set, news ingestion disabled");
        return false;
    };
    let Some(analyzer) = analyzer else {
        warn!("News queue configured but AI is not, consumer not started");
        return false;
    };

    match NewsQueue::connect(queue_config).await {
        Ok(queue) => {
            let coordinator = IngestionCoordinator::new(
                news_repo.clone(),
                sentiment_repo.clone(),
                analyzer.clone(),
            );
            tokio::spawn(run_consumer(queue, coordinator, shutdown.clone()));
            info!(stream = %queue_config.stream, "News consumer started");
            true
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to news queue, ingestion degraded");
            false
        }
    }
}

/// ctrl-c를 기다렸다가 백그라운드 태스크에 취소를 전파합니다.
async fn wait_for_shutdown(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
    shutdown.cancel();
}
