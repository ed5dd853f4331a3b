//! 뉴스 기사 타입.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 수집된 뉴스 기사.
///
/// 감성 추출의 원천 데이터이며, 인제스천 이후에는 불변입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    /// 기사 제목
    pub header: String,
    /// 부제목
    pub subheader: String,
    /// 본문
    pub content: String,
    /// 원문 URL
    pub url: String,
    /// 수집 시각
    pub crawled_at: DateTime<Utc>,
}
