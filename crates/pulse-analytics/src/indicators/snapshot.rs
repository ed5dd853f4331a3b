//! 기술적 지표 스냅샷 계산.
//!
//! 캔들 시퀀스(oldest → newest)로부터 `TechnicalIndicators`를 파생합니다.
//! 순수 함수이며 숨은 상태가 없으므로 동일 입력에 대해 항상 동일한
//! 스냅샷을 반환합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use pulse_core::domain::{
    Candle, MacdSignal, PricePosition, RsiInterpretation, TechnicalIndicators, VolumeTrend,
};

use super::momentum::{MomentumCalculator, RsiParams};
use super::trend::{MacdParams, SmaParams, TrendIndicators};
use super::{IndicatorError, IndicatorResult};

/// 지표 계산에 필요한 최소 캔들 수.
///
/// MA50이 정의되려면 50개가 필요합니다. MA50/RSI 안정성을 위해
/// 호출자는 100개 이상을 공급하는 것이 좋습니다.
pub const MIN_CANDLES: usize = 50;

/// 24시간 통계에 사용하는 trailing 기간 수.
const PERIODS_24H: usize = 24;

/// 거래량 비교에 사용하는 trailing 기간 수.
const VOLUME_PERIODS: usize = 7;

/// 통합 지표 엔진.
///
/// 캔들 시퀀스 하나를 받아 예측 프롬프트에 들어가는 모든 지표를
/// 한 번에 계산합니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기술적 지표 스냅샷 계산.
    ///
    /// 반올림은 표시 정밀도로의 변환일 뿐이며 (가격류 2자리,
    /// 백분율/RSI 1자리) 내부 계산은 전체 정밀도로 수행됩니다.
    ///
    /// # 인자
    /// * `candles` - 캔들 시퀀스, 오래된 것부터 정렬
    ///
    /// # Errors
    /// 캔들이 50개 미만이면 `IndicatorError::InsufficientData`.
    pub fn compute(&self, candles: &[Candle]) -> IndicatorResult<TechnicalIndicators> {
        if candles.len() < MIN_CANDLES {
            return Err(IndicatorError::InsufficientData {
                required: MIN_CANDLES,
                provided: candles.len(),
            });
        }

        let closes: Vec<Decimal> = candles.iter().map(|c| c.close).collect();
        let current_price = closes[closes.len() - 1];

        // RSI(14): 해석은 반올림 전 값으로 판정
        let rsi = self.momentum.rsi_latest(&closes, RsiParams::default())?;
        let rsi_interpretation = if rsi < dec!(30) {
            RsiInterpretation::Oversold
        } else if rsi > dec!(70) {
            RsiInterpretation::Overbought
        } else {
            RsiInterpretation::Neutral
        };

        // MACD(12, 26, 9): 최신 히스토그램의 부호가 라벨을 결정
        let macd_series = self.trend.macd(&closes, MacdParams::default())?;
        let histogram = macd_series[macd_series.len() - 1].histogram;
        let macd_signal = if histogram > Decimal::ZERO {
            MacdSignal::Bullish
        } else {
            MacdSignal::Bearish
        };

        // 이동평균: 위치 비교는 반올림 전 값으로 (strict >, 같으면 below)
        let ma20 = self.trend.sma_latest(&closes, SmaParams { period: 20 })?;
        let ma50 = self.trend.sma_latest(&closes, SmaParams { period: 50 })?;
        let price_vs_ma20 = position_of(current_price, ma20);
        let price_vs_ma50 = position_of(current_price, ma50);

        // 거래량: 최신 거래량 vs trailing 7기간 평균 (최신 포함)
        let volumes: Vec<Decimal> = candles.iter().map(|c| c.volume).collect();
        let volume_window = &volumes[volumes.len().saturating_sub(VOLUME_PERIODS)..];
        let avg_volume: Decimal =
            volume_window.iter().sum::<Decimal>() / Decimal::from(volume_window.len());
        let current_volume = volumes[volumes.len() - 1];
        // 평균이 0이면 (거래 없음) 변동률도 0으로 취급
        let volume_change_pct = if avg_volume.is_zero() {
            Decimal::ZERO
        } else {
            ((current_volume / avg_volume) - Decimal::ONE) * dec!(100)
        };
        let volume_trend = if volume_change_pct > dec!(20) {
            VolumeTrend::High
        } else if volume_change_pct < dec!(-20) {
            VolumeTrend::Low
        } else {
            VolumeTrend::Normal
        };

        // 24시간 통계: 24기간 미만이면 전체 시퀀스 사용
        let reference_close = if closes.len() >= PERIODS_24H {
            closes[closes.len() - PERIODS_24H]
        } else {
            closes[0]
        };
        let price_change_24h = if reference_close.is_zero() {
            Decimal::ZERO
        } else {
            ((current_price / reference_close) - Decimal::ONE) * dec!(100)
        };

        let window_24h = &candles[candles.len().saturating_sub(PERIODS_24H)..];
        let high_24h = window_24h
            .iter()
            .map(|c| c.high)
            .max()
            .unwrap_or(Decimal::ZERO);
        let low_24h = window_24h
            .iter()
            .map(|c| c.low)
            .min()
            .unwrap_or(Decimal::ZERO);

        Ok(TechnicalIndicators {
            current_price,
            price_change_24h: price_change_24h.round_dp(2),
            high_24h,
            low_24h,
            rsi: rsi.round_dp(1),
            rsi_interpretation,
            macd_signal,
            macd_value: histogram.round_dp(2),
            ma20: ma20.round_dp(2),
            ma50: ma50.round_dp(2),
            price_vs_ma20,
            price_vs_ma50,
            volume_change_pct: volume_change_pct.round_dp(1),
            volume_trend,
        })
    }
}

/// 현재가의 이동평균 대비 위치. 같은 값이면 Below (strict >).
fn position_of(price: Decimal, ma: Decimal) -> PricePosition {
    if price > ma {
        PricePosition::Above
    } else {
        PricePosition::Below
    }
}
