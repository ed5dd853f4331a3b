//! 심볼 감성 타입.
//!
//! 추출 직후의 `SymbolSentiment`, 저장된 `SentimentRecord`,
//! 시간 가중 집계 결과인 `SentimentSummary`를 정의합니다.

use crate::types::Symbol;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 감성 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentCategory {
    /// 매수 압력
    Bullish,
    /// 매도 압력
    Bearish,
    /// 중립
    Neutral,
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentCategory::Bullish => write!(f, "Bullish"),
            SentimentCategory::Bearish => write!(f, "Bearish"),
            SentimentCategory::Neutral => write!(f, "Neutral"),
        }
    }
}

impl std::str::FromStr for SentimentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bullish" => Ok(SentimentCategory::Bullish),
            "Bearish" => Ok(SentimentCategory::Bearish),
            "Neutral" => Ok(SentimentCategory::Neutral),
            _ => Err(format!("Unknown sentiment category: {}", s)),
        }
    }
}

/// 뉴스가 심볼에 미치는 영향 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactType {
    /// 기업 펀더멘털/밸류에이션에 직접 영향
    Direct,
    /// 산업/동종업계를 통한 간접 영향
    Sector,
    /// 서사적 언급에 그침
    Contextual,
}

impl ImpactType {
    /// 스토리지 컬럼에 쓰이는 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactType::Direct => "direct",
            ImpactType::Sector => "sector",
            ImpactType::Contextual => "contextual",
        }
    }
}

/// 기사 한 건에서 추출된 심볼별 감성 평가.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSentiment {
    /// 거래 심볼
    pub symbol: Symbol,
    /// 감성 분류
    pub category: SentimentCategory,
    /// 감성 점수 (-1.0 = 강한 매도 압력, +1.0 = 강한 매수 압력)
    pub score: f64,
    /// 영향 유형
    pub impact_type: ImpactType,
    /// 가격이 움직일 수 있는 이유 (한 문장)
    pub rationale: String,
}

impl SymbolSentiment {
    /// 점수가 허용 범위 [-1.0, 1.0]에 있는지 확인합니다.
    pub fn score_in_bounds(&self) -> bool {
        (-1.0..=1.0).contains(&self.score)
    }
}

/// 저장된 감성 레코드.
///
/// 추출 결과가 뉴스 기사 id와 분석 시각으로 태깅되어 저장된 형태입니다.
/// 생성 이후 불변이며, 심볼 + 시간창으로 조회됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    /// 레코드 id
    pub id: Uuid,
    /// 원천 뉴스 기사 id
    pub news_id: Uuid,
    /// 거래 심볼
    pub symbol: Symbol,
    /// 감성 분류
    pub category: SentimentCategory,
    /// 감성 점수
    pub score: f64,
    /// 근거 문장
    pub rationale: String,
    /// 분석 시각
    pub analyzed_at: DateTime<Utc>,
}

/// 전체 감성 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallSentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for OverallSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallSentiment::Bullish => write!(f, "BULLISH"),
            OverallSentiment::Bearish => write!(f, "BEARISH"),
            OverallSentiment::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// 감성 추세.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentTrend {
    Improving,
    Stable,
    Declining,
}

impl fmt::Display for SentimentTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentTrend::Improving => write!(f, "improving"),
            SentimentTrend::Stable => write!(f, "stable"),
            SentimentTrend::Declining => write!(f, "declining"),
        }
    }
}

/// 시간 가중 감성 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// 집계에 포함된 기사 수
    pub articles_count: usize,
    /// 최근 가중 평균 점수 (소수 둘째 자리 반올림)
    pub average_score: f64,
    /// Bullish 레코드 수
    pub bullish_count: usize,
    /// Bearish 레코드 수
    pub bearish_count: usize,
    /// Neutral 레코드 수
    pub neutral_count: usize,
    /// 전체 감성 판정
    pub overall_sentiment: OverallSentiment,
    /// 감성 추세
    pub sentiment_trend: SentimentTrend,
    /// 최근 근거 문장 (최대 3개, 최신순)
    pub top_rationales: Vec<String>,
}

impl SentimentSummary {
    /// 레코드가 전혀 없을 때의 요약.
    pub fn empty() -> Self {
        Self {
            articles_count: 0,
            average_score: 0.0,
            bullish_count: 0,
            bearish_count: 0,
            neutral_count: 0,
            overall_sentiment: OverallSentiment::Neutral,
            sentiment_trend: SentimentTrend::Stable,
            top_rationales: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        let mut sentiment = SymbolSentiment {
            symbol: Symbol::new("BTCUSDT"),
            category: SentimentCategory::Bullish,
            score: 0.8,
            impact_type: ImpactType::Direct,
            rationale: "ETF inflows".to_string(),
        };
        assert!(sentiment.score_in_bounds());

        sentiment.score = 1.5;
        assert!(!sentiment.score_in_bounds());

        sentiment.score = -1.0;
        assert!(sentiment.score_in_bounds());
    }

    #[test]
    fn test_category_serde_format() {
        let json = serde_json::to_string(&SentimentCategory::Bullish).unwrap();
        assert_eq!(json, "\"Bullish\"");
        let parsed: SentimentCategory = serde_json::from_str("\"Neutral\"").unwrap();
        assert_eq!(parsed, SentimentCategory::Neutral);
    }

    #[test]
    fn test_overall_sentiment_serde_format() {
        let json = serde_json::to_string(&OverallSentiment::Bullish).unwrap();
        assert_eq!(json, "\"BULLISH\"");
    }

    #[test]
    fn test_empty_summary() {
        let summary = SentimentSummary::empty();
        assert_eq!(summary.articles_count, 0);
        assert_eq!(summary.overall_sentiment, OverallSentiment::Neutral);
        assert_eq!(summary.sentiment_trend, SentimentTrend::Stable);
        assert!(summary.top_rationales.is_empty());
    }
}
