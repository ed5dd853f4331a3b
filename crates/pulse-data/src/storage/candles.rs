//! 캔들 저장소.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use tracing::debug;

use pulse_core::domain::{Candle, CandleStore, StoreError};
use pulse_core::types::{Interval, Symbol};

use crate::error::DataError;

/// 캔들 데이터베이스 행.
#[derive(Debug, Clone, FromRow)]
struct CandleRow {
    symbol: String,
    interval: String,
    open_time: DateTime<Utc>,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: Decimal,
}

impl CandleRow {
    /// 검증된 도메인 캔들로 변환.
    fn into_candle(self) -> Result<Candle, DataError> {
        let interval: Interval = self
            .interval
            .parse()
            .map_err(|e: String| DataError::InvalidData(e))?;

        Ok(Candle {
            symbol: Symbol::new(self.symbol),
            interval,
            open_time: self.open_time,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        })
    }
}

/// PostgreSQL 캔들 저장소.
#[derive(Clone)]
pub struct CandleRepository {
    pool: PgPool,
}

impl CandleRepository {
    /// 새 저장소를 생성합니다.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandleStore for CandleRepository {
    async fn recent_candles(
        &self,
        symbol: &Symbol,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, StoreError> {
        let rows: Vec<CandleRow> = sqlx::query_as(
            r#"
            SELECT symbol, interval, open_time, open, high, low, close, volume
            FROM price_candles
            WHERE symbol = $1 AND interval = $2
            ORDER BY open_time DESC
            LIMIT $3
            "#,
        )
        .bind(symbol.as_str())
        .bind(interval.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::from(DataError::from(e)))?;

        // 지표 계산은 oldest-first를 요구하므로 뒤집어서 반환
        let mut candles = rows
            .into_iter()
            .map(|row| row.into_candle().map_err(StoreError::from))
            .collect::<Result<Vec<_>, _>>()?;
        candles.reverse();

        debug!(
            symbol = %symbol,
            interval = %interval,
            count = candles.len(),
            "Fetched recent candles"
        );
        Ok(candles)
    }
}
