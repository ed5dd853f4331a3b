//! 모멘텀 지표 (Momentum Indicators).
//!
//! 과매수/과매도 상태를 측정하는 RSI를 제공합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 최신 RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭
    ///
    /// 상승폭/하락폭은 종가 간 변화량에서 분리하며, 마지막 `period`개
    /// 변화량의 단순 평균을 사용합니다.
    ///
    /// 평균 하락폭이 0이면 (가격이 하락한 적이 없거나 전혀 움직이지
    /// 않은 경우) RSI는 100으로 고정됩니다. 0으로 나누는 일은 없습니다.
    ///
    /// # 인자
    /// * `prices` - 가격 데이터 (종가)
    /// * `params` - RSI 파라미터
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값
    pub fn rsi_latest(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Decimal> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "period must be greater than 0".to_string(),
            ));
        }
        if prices.len() < period + 1 {
            return Err(IndicatorError::InsufficientData {
                required: period + 1,
                provided: prices.len(),
            });
        }

        // 마지막 period개 변화량만 필요
        let window = &prices[prices.len() - (period + 1)..];

        let mut gain_sum = Decimal::ZERO;
        let mut loss_sum = Decimal::ZERO;
        for pair in window.windows(2) {
            let delta = pair[1] - pair[0];
            if delta > Decimal::ZERO {
                gain_sum += delta;
            } else {
                loss_sum += -delta;
            }
        }

        let avg_gain = gain_sum / Decimal::from(period);
        let avg_loss = loss_sum / Decimal::from(period);

        if avg_loss.is_zero() {
            return Ok(dec!(100));
        }

        let rs = avg_gain / avg_loss;
        Ok(dec!(100) - (dec!(100) / (Decimal::ONE + rs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rsi_in_range() {
        let momentum = MomentumCalculator::new();
        let prices = vec![
            dec!(100.0),
            dec!(102.0),
            dec!(101.0),
            dec!(103.0),
            dec!(105.0),
            dec!(104.0),
            dec!(106.0),
            dec!(108.0),
            dec!(107.0),
            dec!(109.0),
            dec!(111.0),
            dec!(110.0),
            dec!(112.0),
            dec!(114.0),
            dec!(113.0),
            dec!(115.0),
        ];

        let rsi = momentum.rsi_latest(&prices, RsiParams::default()).unwrap();

        assert!(rsi >= Decimal::ZERO);
        assert!(rsi <= dec!(100));
    }

    #[test]
    fn test_rsi_all_rising_clamps_to_100() {
        let momentum = MomentumCalculator::new();

        // 하락이 전혀 없는 시장: 평균 하락폭 0
        let prices: Vec<Decimal> = (0..20).map(|i| Decimal::from(100 + i)).collect();

        let rsi = momentum.rsi_latest(&prices, RsiParams::default()).unwrap();
        assert_eq!(rsi, dec!(100));
    }

    #[test]
    fn test_rsi_constant_prices_clamps_to_100() {
        let momentum = MomentumCalculator::new();

        // 가격 변동 없음: 상승폭도 하락폭도 0, NaN 대신 100으로 고정
        let prices = vec![dec!(100); 20];

        let rsi = momentum.rsi_latest(&prices, RsiParams::default()).unwrap();
        assert_eq!(rsi, dec!(100));
    }

    #[test]
    fn test_rsi_all_falling_is_zero() {
        let momentum = MomentumCalculator::new();

        // 상승이 전혀 없는 시장: RS = 0, RSI = 0
        let prices: Vec<Decimal> = (0..20).map(|i| Decimal::from(200 - i)).collect();

        let rsi = momentum.rsi_latest(&prices, RsiParams::default()).unwrap();
        assert_eq!(rsi, Decimal::ZERO);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let momentum = MomentumCalculator::new();
        let prices = vec![dec!(100); 10];

        let result = momentum.rsi_latest(&prices, RsiParams::default());
        assert!(matches!(
            result,
            Err(IndicatorError::InsufficientData {
                required: 15,
                provided: 10
            })
        ));
    }
}
