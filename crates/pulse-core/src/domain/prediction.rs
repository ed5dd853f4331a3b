//! 기술적 지표 스냅샷 및 가격 예측 타입.

use crate::domain::sentiment::SentimentSummary;
use crate::types::Symbol;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RSI 해석.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiInterpretation {
    /// RSI < 30
    Oversold,
    /// 30 ≤ RSI ≤ 70
    Neutral,
    /// RSI > 70
    Overbought,
}

impl fmt::Display for RsiInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsiInterpretation::Oversold => write!(f, "oversold"),
            RsiInterpretation::Neutral => write!(f, "neutral"),
            RsiInterpretation::Overbought => write!(f, "overbought"),
        }
    }
}

/// MACD 신호 라벨. 최신 히스토그램의 부호로 결정됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacdSignal {
    /// 히스토그램 > 0
    Bullish,
    /// 히스토그램 ≤ 0
    Bearish,
}

impl fmt::Display for MacdSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacdSignal::Bullish => write!(f, "bullish"),
            MacdSignal::Bearish => write!(f, "bearish"),
        }
    }
}

/// 현재가의 이동평균 대비 위치. 같은 값이면 Below입니다 (strict >).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricePosition {
    Above,
    Below,
}

impl fmt::Display for PricePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricePosition::Above => write!(f, "above"),
            PricePosition::Below => write!(f, "below"),
        }
    }
}

/// 거래량 추세.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTrend {
    /// 7기간 평균 대비 +20% 초과
    High,
    /// -20% ~ +20%
    Normal,
    /// -20% 미만
    Low,
}

impl fmt::Display for VolumeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeTrend::High => write!(f, "high"),
            VolumeTrend::Normal => write!(f, "normal"),
            VolumeTrend::Low => write!(f, "low"),
        }
    }
}

/// 기술적 지표 스냅샷.
///
/// 캔들 시퀀스에서 조회 시점에 파생되는 불변 스냅샷입니다.
/// 원천 데이터로 저장되지 않으며 캔들에서 언제든 재파생 가능합니다.
/// 반올림은 표시용이며 내부 계산은 전체 정밀도로 수행됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    /// 현재가 (마지막 종가)
    pub current_price: Decimal,
    /// 24기간 가격 변동률 (%)
    pub price_change_24h: Decimal,
    /// 24기간 최고가
    pub high_24h: Decimal,
    /// 24기간 최저가
    pub low_24h: Decimal,
    /// RSI(14), 0-100
    pub rsi: Decimal,
    /// RSI 해석
    pub rsi_interpretation: RsiInterpretation,
    /// MACD 신호 라벨
    pub macd_signal: MacdSignal,
    /// 최신 MACD 히스토그램 값
    pub macd_value: Decimal,
    /// 20기간 단순 이동평균
    pub ma20: Decimal,
    /// 50기간 단순 이동평균
    pub ma50: Decimal,
    /// 현재가의 MA20 대비 위치
    pub price_vs_ma20: PricePosition,
    /// 현재가의 MA50 대비 위치
    pub price_vs_ma50: PricePosition,
    /// 7기간 평균 대비 거래량 변동률 (%)
    pub volume_change_pct: Decimal,
    /// 거래량 추세
    pub volume_trend: VolumeTrend,
}

/// 예측된 가격 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictedDirection {
    Up,
    Down,
    Neutral,
}

impl fmt::Display for PredictedDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictedDirection::Up => write!(f, "UP"),
            PredictedDirection::Down => write!(f, "DOWN"),
            PredictedDirection::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// 가격 방향 예측 결과.
///
/// 요청당 한 번 생성되는 종단 산출물이며 생성 후 변경되지 않습니다.
/// 영속화 여부는 호출자의 책임입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePrediction {
    /// 거래 심볼
    pub symbol: Symbol,
    /// 예측 방향
    pub prediction: PredictedDirection,
    /// 신뢰도 [0, 1]
    pub confidence: f64,
    /// 기술/감성 요인을 결합한 근거
    pub reasoning: String,
    /// 주요 요인
    pub key_factors: Vec<String>,
    /// 리스크 요인
    pub risk_factors: Vec<String>,
    /// 예측에 사용된 기술적 지표
    pub technical_indicators: TechnicalIndicators,
    /// 예측에 사용된 감성 요약
    pub sentiment_summary: SentimentSummary,
    /// 예측 완료 시각
    pub predicted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicted_direction_serde_format() {
        let json = serde_json::to_string(&PredictedDirection::Up).unwrap();
        assert_eq!(json, "\"UP\"");
        let parsed: PredictedDirection = serde_json::from_str("\"NEUTRAL\"").unwrap();
        assert_eq!(parsed, PredictedDirection::Neutral);
    }

    #[test]
    fn test_lowercase_labels() {
        assert_eq!(
            serde_json::to_string(&VolumeTrend::High).unwrap(),
            "\"high\""
        );
        assert_eq!(
            serde_json::to_string(&PricePosition::Above).unwrap(),
            "\"above\""
        );
        assert_eq!(
            serde_json::to_string(&RsiInterpretation::Oversold).unwrap(),
            "\"oversold\""
        );
    }
}
