//! 뉴스 기사 저장소.

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::info;
use uuid::Uuid;

use pulse_core::domain::{NewsArticle, NewsStore, StoreError};

use crate::error::DataError;

/// PostgreSQL 뉴스 기사 저장소.
#[derive(Clone)]
pub struct NewsRepository {
    pool: PgPool,
}

impl NewsRepository {
    /// 새 저장소를 생성합니다.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NewsStore for NewsRepository {
    async fn insert_news(&self, article: &NewsArticle) -> Result<Uuid, StoreError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO news_articles
                (header, subheader, content, url, crawled_at, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING id
            "#,
        )
        .bind(&article.header)
        .bind(&article.subheader)
        .bind(&article.content)
        .bind(&article.url)
        .bind(article.crawled_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from(DataError::from(e)))?;

        info!(news_id = %id, "Inserted news article");
        Ok(id)
    }
}
