//! 감성 집계기.
//!
//! 시간 가중 감쇠(반감기 12시간)를 적용해 감성 레코드들을
//! `SentimentSummary`로 집계합니다.

use chrono::{DateTime, Utc};
use tracing::warn;

use pulse_core::domain::{OverallSentiment, SentimentCategory, SentimentRecord, SentimentSummary, SentimentTrend};

/// 감쇠 반감기 (시간).
const DECAY_HALF_LIFE_HOURS: f64 = 12.0;

/// 전체 감성 판정 임계값.
const OVERALL_THRESHOLD: f64 = 0.3;

/// 추세 판정 밴드.
const TREND_BAND: f64 = 0.2;

/// 요약에 포함할 근거 문장 수.
const TOP_RATIONALES: usize = 3;

/// 감성 집계기.
///
/// 입력 레코드는 최신순(newest-first)이어야 합니다. 이 전제조건은
/// 검증되며, 위반 시 경고를 남기고 내부적으로 최신순 정렬 후
/// 집계합니다. 추세 계산이 순서에 민감하기 때문입니다.
#[derive(Debug, Default)]
pub struct SentimentAggregator;

impl SentimentAggregator {
    /// 새로운 감성 집계기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 감성 레코드들을 요약으로 집계.
    ///
    /// 빈 입력이면 에러 없이 0건 중립 요약을 반환합니다.
    ///
    /// # 인자
    /// * `records` - 감성 레코드, 최신순 정렬
    /// * `now` - 나이 계산 기준 시각
    pub fn aggregate(&self, records: &[SentimentRecord], now: DateTime<Utc>) -> SentimentSummary {
        if records.is_empty() {
            return SentimentSummary::empty();
        }

        // 전제조건 검증: analyzed_at 비증가(최신순)
        let sorted_storage;
        let records: &[SentimentRecord] = if is_newest_first(records) {
            records
        } else {
            warn!(
                count = records.len(),
                "Sentiment records are not sorted newest-first, re-sorting before aggregation"
            );
            let mut sorted = records.to_vec();
            sorted.sort_by(|a, b| b.analyzed_at.cmp(&a.analyzed_at));
            sorted_storage = sorted;
            &sorted_storage
        };

        let bullish_count = count_category(records, SentimentCategory::Bullish);
        let bearish_count = count_category(records, SentimentCategory::Bearish);
        let neutral_count = count_category(records, SentimentCategory::Neutral);

        // 시간 가중 평균: weight = exp(-age_hours / 12)
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        for record in records {
            let age_hours = (now - record.analyzed_at).num_seconds() as f64 / 3600.0;
            let weight = (-age_hours / DECAY_HALF_LIFE_HOURS).exp();
            weighted_sum += record.score * weight;
            total_weight += weight;
        }
        let average_score = if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        };

        let overall_sentiment = if average_score > OVERALL_THRESHOLD {
            OverallSentiment::Bullish
        } else if average_score < -OVERALL_THRESHOLD {
            OverallSentiment::Bearish
        } else {
            OverallSentiment::Neutral
        };

        // 추세: 앞쪽 절반(최근) vs 뒤쪽 절반(과거)의 비가중 평균 비교
        let mid = records.len() / 2;
        let recent_avg = if mid > 0 {
            mean_score(&records[..mid])
        } else {
            0.0
        };
        let older_avg = if records.len() > mid {
            mean_score(&records[mid..])
        } else {
            0.0
        };
        let sentiment_trend = if recent_avg > older_avg + TREND_BAND {
            SentimentTrend::Improving
        } else if recent_avg < older_avg - TREND_BAND {
            SentimentTrend::Declining
        } else {
            SentimentTrend::Stable
        };

        let top_rationales = records
            .iter()
            .filter(|r| !r.rationale.is_empty())
            .take(TOP_RATIONALES)
            .map(|r| r.rationale.clone())
            .collect();

        SentimentSummary {
            articles_count: records.len(),
            average_score: (average_score * 100.0).round() / 100.0,
            bullish_count,
            bearish_count,
            neutral_count,
            overall_sentiment,
            sentiment_trend,
            top_rationales,
        }
    }
}

/// analyzed_at이 비증가 순서인지 확인합니다.
fn is_newest_first(records: &[SentimentRecord]) -> bool {
    records
        .windows(2)
        .all(|pair| pair[0].analyzed_at >= pair[1].analyzed_at)
}

fn count_category(records: &[SentimentRecord], category: SentimentCategory) -> usize {
    records.iter().filter(|r| r.category == category).count()
}

fn mean_score(records: &[SentimentRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|r| r.score).sum::<f64>() / records.len() as f64
}
