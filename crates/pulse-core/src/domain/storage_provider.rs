//! 스토리지 협력자 추상화.
//!
//! 뉴스/감성/캔들 저장소에 대한 저장소 중립적인 인터페이스를 제공합니다.
//! 구현체는 `pulse-data`에 있으며, 인제스천 파이프라인은 이 trait들을
//! 통해서만 저장소에 접근하므로 스텁으로 대체해 테스트할 수 있습니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::{Candle, NewsArticle, SentimentRecord, SymbolSentiment};
use crate::types::{Interval, Symbol};

/// 스토리지 협력자 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 연결 실패
    #[error("Connection error: {0}")]
    Connection(String),

    /// 쿼리 실행 실패
    #[error("Query error: {0}")]
    Query(String),

    /// 레코드 매핑 실패 (스키마 불일치)
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// 뉴스 기사 저장소.
#[async_trait]
pub trait NewsStore: Send + Sync {
    /// 기사를 저장하고 생성된 id를 반환합니다.
    async fn insert_news(&self, article: &NewsArticle) -> Result<Uuid, StoreError>;
}

/// 감성 레코드 저장소.
#[async_trait]
pub trait SentimentStore: Send + Sync {
    /// 추출된 감성들을 뉴스 기사 id로 태깅하여 저장하고
    /// 생성된 id들을 반환합니다. 빈 입력이면 빈 벡터를 반환합니다.
    async fn insert_sentiments(
        &self,
        news_id: Uuid,
        sentiments: &[SymbolSentiment],
    ) -> Result<Vec<Uuid>, StoreError>;

    /// 심볼의 감성 레코드를 trailing 시간창으로 조회합니다.
    /// 결과는 최신순(newest-first)으로 정렬됩니다.
    async fn sentiments_since(
        &self,
        symbol: &Symbol,
        since: DateTime<Utc>,
    ) -> Result<Vec<SentimentRecord>, StoreError>;
}

/// 캔들 저장소.
#[async_trait]
pub trait CandleStore: Send + Sync {
    /// (심볼, 간격)의 최근 캔들 N개를 조회합니다.
    /// 결과는 오래된 것부터(oldest-first) 정렬됩니다.
    async fn recent_candles(
        &self,
        symbol: &Symbol,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, StoreError>;
}
