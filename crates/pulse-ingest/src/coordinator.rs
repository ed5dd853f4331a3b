//! 인제스천 코디네이터.
//!
//! 기사 한 건의 처리 파이프라인: 감성 추출 → 뉴스 저장 → 감성 레코드
//! 저장. 스토리지와 추출기는 trait 경계 뒤에 있어 스텁으로 대체해
//! 테스트할 수 있습니다.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use pulse_ai::{AiError, SentimentAnalyzer};
use pulse_core::domain::{NewsArticle, NewsStore, SentimentStore, StoreError, SymbolSentiment};

/// 인제스천 처리 에러.
///
/// 어떤 변형이든 메시지는 ack되지 않은 채 남아 큐의 재전달 정책에
/// 맡겨집니다.
#[derive(Debug, Error)]
pub enum IngestError {
    /// 감성 추출 실패
    #[error("Sentiment extraction failed: {0}")]
    Extraction(#[from] AiError),

    /// 스토리지 실패
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StoreError),
}

/// 감성 추출기 seam.
///
/// 운영 구현은 `SentimentAnalyzer`이며, 코디네이터 테스트에서는
/// 스텁으로 대체됩니다.
#[async_trait]
pub trait ExtractSentiments: Send + Sync {
    /// 기사에서 심볼별 감성을 추출합니다.
    async fn extract(&self, article: &NewsArticle) -> Result<Vec<SymbolSentiment>, AiError>;
}

#[async_trait]
impl ExtractSentiments for SentimentAnalyzer {
    async fn extract(&self, article: &NewsArticle) -> Result<Vec<SymbolSentiment>, AiError> {
        self.analyze(article).await
    }
}

/// 처리 결과.
#[derive(Debug)]
pub struct ProcessedArticle {
    /// 저장된 뉴스 기사 id
    pub news_id: Uuid,
    /// 저장된 감성 레코드 id들
    pub sentiment_ids: Vec<Uuid>,
}

/// 인제스천 코디네이터.
pub struct IngestionCoordinator<N, S, E> {
    news_store: Arc<N>,
    sentiment_store: Arc<S>,
    extractor: Arc<E>,
}

impl<N, S, E> IngestionCoordinator<N, S, E>
where
    N: NewsStore,
    S: SentimentStore,
    E: ExtractSentiments,
{
    /// 새 코디네이터를 생성합니다.
    pub fn new(news_store: Arc<N>, sentiment_store: Arc<S>, extractor: Arc<E>) -> Self {
        Self {
            news_store,
            sentiment_store,
            extractor,
        }
    }

    /// 기사 한 건을 처리합니다.
    ///
    /// 추출이 성공해야 기사와 감성이 저장됩니다. 심볼이 하나도
    /// 추출되지 않은 것도 성공입니다 (기사만 저장).
    pub async fn process_article(
        &self,
        article: &NewsArticle,
    ) -> Result<ProcessedArticle, IngestError> {
        let sentiments = self.extractor.extract(article).await?;

        let news_id = self.news_store.insert_news(article).await?;
        let sentiment_ids = self
            .sentiment_store
            .insert_sentiments(news_id, &sentiments)
            .await?;

        info!(
            news_id = %news_id,
            sentiments = sentiment_ids.len(),
            "Article processed"
        );

        Ok(ProcessedArticle {
            news_id,
            sentiment_ids,
        })
    }
}
