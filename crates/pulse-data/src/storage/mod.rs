//! PostgreSQL 스토리지 구현.
//!
//! 저장소 경계에서 DB 행을 검증된 도메인 레코드로 변환합니다.
//! 알 수 없는 카테고리나 누락 필드는 여기서 조기에 거부됩니다.

pub mod candles;
pub mod news;
pub mod sentiments;

pub use candles::CandleRepository;
pub use news::NewsRepository;
pub use sentiments::SentimentRepository;

use crate::error::{DataError, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// 데이터베이스 연결 풀을 생성하고 연결을 확인합니다.
///
/// 스토리지는 필수 의존성이므로 여기서의 실패는 호출자(기동 경로)에서
/// 치명적으로 처리됩니다.
pub async fn connect_database(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url)
        .await
        .map_err(|e| DataError::ConnectionError(e.to_string()))?;

    // 연결 확인 (ping)
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| DataError::ConnectionError(e.to_string()))?;

    info!("PostgreSQL connection established");
    Ok(pool)
}
