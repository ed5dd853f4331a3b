//! 감성 레코드 저장소.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use tracing::debug;
use uuid::Uuid;

use pulse_core::domain::{SentimentRecord, SentimentStore, StoreError, SymbolSentiment};
use pulse_core::types::Symbol;

use crate::error::DataError;

/// 감성 레코드 데이터베이스 행.
#[derive(Debug, Clone, FromRow)]
struct SentimentRow {
    id: Uuid,
    news_id: Uuid,
    symbol: String,
    category: String,
    score: f64,
    rationale: String,
    analyzed_at: DateTime<Utc>,
}

impl SentimentRow {
    /// 검증된 도메인 레코드로 변환.
    ///
    /// 알 수 없는 카테고리는 여기서 거부되어 집계 로직으로 흘러가지
    /// 않습니다.
    fn into_record(self) -> Result<SentimentRecord, DataError> {
        let category = self
            .category
            .parse()
            .map_err(|e: String| DataError::InvalidData(e))?;

        Ok(SentimentRecord {
            id: self.id,
            news_id: self.news_id,
            symbol: Symbol::new(self.symbol),
            category,
            score: self.score,
            rationale: self.rationale,
            analyzed_at: self.analyzed_at,
        })
    }
}

/// PostgreSQL 감성 레코드 저장소.
#[derive(Clone)]
pub struct SentimentRepository {
    pool: PgPool,
}

impl SentimentRepository {
    /// 새 저장소를 생성합니다.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SentimentStore for SentimentRepository {
    async fn insert_sentiments(
        &self,
        news_id: Uuid,
        sentiments: &[SymbolSentiment],
    ) -> Result<Vec<Uuid>, StoreError> {
        if sentiments.is_empty() {
            return Ok(Vec::new());
        }

        // UNNEST 패턴으로 일괄 삽입 (N+1 쿼리 문제 해결)
        let symbols: Vec<String> = sentiments
            .iter()
            .map(|s| s.symbol.as_str().to_string())
            .collect();
        let categories: Vec<String> = sentiments.iter().map(|s| s.category.to_string()).collect();
        let scores: Vec<f64> = sentiments.iter().map(|s| s.score).collect();
        let impact_types: Vec<String> = sentiments
            .iter()
            .map(|s| s.impact_type.as_str().to_string())
            .collect();
        let rationales: Vec<String> = sentiments.iter().map(|s| s.rationale.clone()).collect();

        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO symbol_sentiments
                (news_id, symbol, category, score, impact_type, rationale, analyzed_at)
            SELECT $1, * FROM UNNEST(
                $2::text[], $3::text[], $4::float8[], $5::text[], $6::text[]
            ), NOW()
            RETURNING id
            "#,
        )
        .bind(news_id)
        .bind(&symbols)
        .bind(&categories)
        .bind(&scores)
        .bind(&impact_types)
        .bind(&rationales)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::from(DataError::from(e)))?;

        debug!(news_id = %news_id, count = ids.len(), "Inserted sentiment records");
        Ok(ids)
    }

    async fn sentiments_since(
        &self,
        symbol: &Symbol,
        since: DateTime<Utc>,
    ) -> Result<Vec<SentimentRecord>, StoreError> {
        let rows: Vec<SentimentRow> = sqlx::query_as(
            r#"
            SELECT id, news_id, symbol, category, score, rationale, analyzed_at
            FROM symbol_sentiments
            WHERE symbol = $1 AND analyzed_at >= $2
            ORDER BY analyzed_at DESC
            "#,
        )
        .bind(symbol.as_str())
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::from(DataError::from(e)))?;

        rows.into_iter()
            .map(|row| row.into_record().map_err(StoreError::from))
            .collect()
    }
}
