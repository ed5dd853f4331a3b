//! 큐 컨슈머 루프.
//!
//! 한 번에 한 건씩 읽고, 디코딩 불가 메시지는 로그 후 버리며(ack),
//! 처리 실패 메시지는 ack하지 않고 pending으로 남깁니다. 재전달은
//! 큐 클라이언트 레이어의 정책입니다.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::coordinator::{ExtractSentiments, IngestionCoordinator};
use crate::message::decode_article_message;
use pulse_core::domain::{NewsStore, SentimentStore};
use pulse_data::NewsQueue;

/// 큐 읽기 실패 후 재시도 대기 시간.
const READ_RETRY_DELAY: Duration = Duration::from_secs(5);

/// 컨슈머 루프를 실행합니다.
///
/// `shutdown`이 취소될 때까지 돌며, 블록 타임아웃마다 취소 여부를
/// 확인합니다.
pub async fn run_consumer<N, S, E>(
    queue: NewsQueue,
    coordinator: IngestionCoordinator<N, S, E>,
    shutdown: CancellationToken,
) where
    N: NewsStore,
    S: SentimentStore,
    E: ExtractSentiments,
{
    info!("News consumer started");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Shutdown requested, stopping news consumer");
                break;
            }
            read = queue.read_next() => {
                match read {
                    Ok(Some(message)) => {
                        handle_message(&queue, &coordinator, &message.id, &message.payload).await;
                    }
                    Ok(None) => {
                        // 블록 타임아웃, 다음 루프에서 다시 대기
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to read from news queue, retrying");
                        tokio::time::sleep(READ_RETRY_DELAY).await;
                    }
                }
            }
        }
    }

    info!("News consumer stopped");
}

/// 메시지 한 건을 처리합니다.
async fn handle_message<N, S, E>(
    queue: &NewsQueue,
    coordinator: &IngestionCoordinator<N, S, E>,
    message_id: &str,
    payload: &str,
) where
    N: NewsStore,
    S: SentimentStore,
    E: ExtractSentiments,
{
    let article = match decode_article_message(payload) {
        Ok(article) => article,
        Err(e) => {
            // 디코딩 불가 메시지는 재전달해도 소용없으므로 버린다
            warn!(message_id = %message_id, error = %e, "Dropping malformed article message");
            if let Err(ack_err) = queue.ack(message_id).await {
                error!(message_id = %message_id, error = %ack_err, "Failed to ack dropped message");
            }
            return;
        }
    };

    info!(header = %article.header, "Received news article");

    match coordinator.process_article(&article).await {
        Ok(outcome) => {
            if let Err(e) = queue.ack(message_id).await {
                error!(message_id = %message_id, error = %e, "Failed to ack processed message");
                return;
            }
            info!(
                message_id = %message_id,
                news_id = %outcome.news_id,
                sentiments = outcome.sentiment_ids.len(),
                "Article message processed"
            );
        }
        Err(e) => {
            // ack하지 않는다: 메시지는 pending으로 남아 큐의 재전달
            // 정책에 따라 다시 전달된다
            error!(
                message_id = %message_id,
                error = %e,
                "Article processing failed, message left pending for redelivery"
            );
        }
    }
}
