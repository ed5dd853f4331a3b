//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간 (span).
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 12 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Decimal,
    /// 시그널 라인 (MACD 라인의 EMA).
    pub signal: Decimal,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Decimal,
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 마지막 `period`개 값의 단순 이동평균.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 인자
    /// * `prices` - 가격 데이터 (종가)
    /// * `params` - SMA 파라미터
    pub fn sma_latest(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<Decimal> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "period must be greater than 0".to_string(),
            ));
        }
        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let window = &prices[prices.len() - period..];
        let sum: Decimal = window.iter().sum();
        Ok(sum / Decimal::from(period))
    }

    /// 지수 이동평균 (EMA) 시리즈 계산.
    ///
    /// 재귀형 EMA: alpha = 2 / (period + 1), 첫 값으로 시드.
    /// EMA[0] = P[0], EMA[i] = alpha * P[i] + (1 - alpha) * EMA[i-1]
    ///
    /// 모든 시점에서 값이 정의되므로 MACD 계산이 시퀀스 전체에서
    /// 이어집니다.
    ///
    /// # 인자
    /// * `prices` - 가격 데이터 (종가)
    /// * `params` - EMA 파라미터 (span)
    pub fn ema_series(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Decimal>> {
        if params.period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "period must be greater than 0".to_string(),
            ));
        }
        if prices.is_empty() {
            return Err(IndicatorError::InsufficientData {
                required: 1,
                provided: 0,
            });
        }

        let alpha = Decimal::from(2) / Decimal::from(params.period + 1);
        let one_minus_alpha = Decimal::ONE - alpha;

        let mut result = Vec::with_capacity(prices.len());
        let mut ema = prices[0];
        result.push(ema);

        for price in &prices[1..] {
            ema = (*price * alpha) + (ema * one_minus_alpha);
            result.push(ema);
        }

        Ok(result)
    }

    /// MACD (Moving Average Convergence Divergence) 시리즈 계산.
    ///
    /// MACD 라인 = EMA(fast) - EMA(slow)
    /// 시그널 = MACD 라인의 EMA(signal)
    /// 히스토그램 = MACD - 시그널
    ///
    /// # 인자
    /// * `prices` - 가격 데이터 (종가)
    /// * `params` - MACD 파라미터 (단기, 장기, 시그널 기간)
    pub fn macd(
        &self,
        prices: &[Decimal],
        params: MacdParams,
    ) -> IndicatorResult<Vec<MacdResult>> {
        if params.fast_period >= params.slow_period {
            return Err(IndicatorError::InvalidParameter(
                "fast_period must be smaller than slow_period".to_string(),
            ));
        }

        let fast_ema = self.ema_series(
            prices,
            EmaParams {
                period: params.fast_period,
            },
        )?;
        let slow_ema = self.ema_series(
            prices,
            EmaParams {
                period: params.slow_period,
            },
        )?;

        // MACD 라인 계산
        let macd_line: Vec<Decimal> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(fast, slow)| fast - slow)
            .collect();

        // 시그널 라인 계산 (MACD 라인의 EMA)
        let signal_line = self.ema_series(
            &macd_line,
            EmaParams {
                period: params.signal_period,
            },
        )?;

        let result = macd_line
            .iter()
            .zip(signal_line.iter())
            .map(|(macd, signal)| MacdResult {
                macd: *macd,
                signal: *signal,
                histogram: macd - signal,
            })
            .collect();

        Ok(result)
    }
}
