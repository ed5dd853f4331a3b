//! 큐 메시지 계약.
//!
//! 큐는 JSON 인코딩된 뉴스 기사 메시지를 한 번에 한 건씩 전달합니다.
//! 필수 필드: header, subheader, content, url, crawled_at
//! (ISO-8601, 'Z' 접미사 허용 — UTC 오프셋으로 정규화).

use chrono::{DateTime, Utc};
use serde::Deserialize;

use pulse_core::domain::NewsArticle;

/// 디코딩 실패 사유.
///
/// 디코딩에 실패한 메시지는 로그를 남기고 버려집니다(ack).
/// 컨슈머를 중단시키지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// JSON 파싱 실패 또는 필수 필드 누락
    #[error("Malformed article message: {0}")]
    Malformed(String),

    /// crawled_at 타임스탬프 파싱 실패
    #[error("Invalid crawled_at timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Wire 형식의 기사 메시지.
#[derive(Debug, Deserialize)]
struct ArticleMessage {
    header: String,
    subheader: String,
    content: String,
    url: String,
    crawled_at: String,
}

/// JSON 페이로드를 뉴스 기사로 디코딩합니다.
pub fn decode_article_message(payload: &str) -> Result<NewsArticle, DecodeError> {
    let message: ArticleMessage =
        serde_json::from_str(payload).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    // RFC 3339 파서는 'Z' 접미사와 명시적 오프셋을 모두 허용
    let crawled_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&message.crawled_at)
        .map_err(|e| DecodeError::InvalidTimestamp(format!("{}: {}", message.crawled_at, e)))?
        .with_timezone(&Utc);

    Ok(NewsArticle {
        header: message.header,
        subheader: message.subheader,
        content: message.content,
        url: message.url,
        crawled_at,
    })
}
