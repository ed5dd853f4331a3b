//! 뉴스 이벤트 큐 (Redis Streams).
//!
//! 컨슈머 그룹으로 뉴스 기사 이벤트를 한 번에 한 건씩 읽습니다
//! (prefetch 1 의미론). 처리에 성공한 메시지만 ack되며, ack되지 않은
//! 메시지는 pending 상태로 남아 큐의 재전달 정책에 맡겨집니다.
//! 여러 컨슈머 인스턴스는 서로 다른 컨슈머 이름으로 같은 그룹에
//! 참여할 수 있습니다.

use redis::aio::ConnectionManager;
use redis::streams::{StreamReadOptions, StreamReadReply};
use redis::{AsyncCommands, Client};
use tracing::{debug, info};

use crate::error::{DataError, Result};
use pulse_core::config::QueueConfig;

/// 큐에서 읽은 메시지 한 건.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    /// 스트림 엔트리 id (ack에 사용)
    pub id: String,
    /// JSON 페이로드
    pub payload: String,
}

/// Redis Streams 뉴스 큐.
pub struct NewsQueue {
    connection: ConnectionManager,
    stream: String,
    group: String,
    consumer: String,
    block_ms: u64,
}

impl NewsQueue {
    /// 큐에 연결하고 컨슈머 그룹을 보장합니다.
    ///
    /// 그룹이 이미 존재하면(BUSYGROUP) 정상으로 취급합니다.
    pub async fn connect(config: &QueueConfig) -> Result<Self> {
        info!(stream = %config.stream, group = %config.group, "Connecting to news queue");

        let client = Client::open(config.url.as_str())?;
        let mut connection = client.get_connection_manager().await?;

        let created: std::result::Result<(), redis::RedisError> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(&config.stream)
            .arg(&config.group)
            .arg("$")
            .arg("MKSTREAM")
            .query_async(&mut connection)
            .await;

        match created {
            Ok(()) => info!(group = %config.group, "Consumer group created"),
            Err(e) if e.to_string().contains("BUSYGROUP") => {
                debug!(group = %config.group, "Consumer group already exists");
            }
            Err(e) => return Err(DataError::from(e)),
        }

        info!("News queue connection established");

        Ok(Self {
            connection,
            stream: config.stream.clone(),
            group: config.group.clone(),
            consumer: config.consumer.clone(),
            block_ms: config.block_ms,
        })
    }

    /// 다음 메시지 한 건을 블로킹 읽기로 가져옵니다.
    ///
    /// COUNT 1이므로 이 컨슈머에는 동시에 한 건만 in-flight 상태가
    /// 됩니다. 블록 타임아웃 안에 메시지가 없으면 `None`.
    pub async fn read_next(&self) -> Result<Option<QueueMessage>> {
        let mut conn = self.connection.clone();

        let options = StreamReadOptions::default()
            .group(&self.group, &self.consumer)
            .count(1)
            .block(self.block_ms as usize);

        let reply: Option<StreamReadReply> = conn
            .xread_options(&[&self.stream], &[">"], &options)
            .await?;

        let Some(reply) = reply else {
            return Ok(None);
        };

        for key in reply.keys {
            for entry in key.ids {
                let payload: String = entry.get("payload").ok_or_else(|| {
                    DataError::QueueError(format!(
                        "stream entry {} has no payload field",
                        entry.id
                    ))
                })?;
                return Ok(Some(QueueMessage {
                    id: entry.id,
                    payload,
                }));
            }
        }

        Ok(None)
    }

    /// 메시지를 성공 처리로 확인(ack)합니다.
    pub async fn ack(&self, message_id: &str) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: i64 = conn.xack(&self.stream, &self.group, &[message_id]).await?;
        debug!(message_id = %message_id, "Acknowledged queue message");
        Ok(())
    }

    /// 큐 상태를 확인합니다.
    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = self.connection.clone();
        let result: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(result == "PONG")
    }
}
