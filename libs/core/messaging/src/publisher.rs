//! JetStream publisher for durable queue messages.

use crate::error::MessagingError;
use crate::metrics::QueueMetrics;
use crate::queue::ensure_stream;
use async_nats::jetstream::{self, Context};
use async_nats::Client;
use core_config::nats::NatsConfig;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

struct Connection {
    client: Client,
    jetstream: Context,
}

/// Publishes JSON messages to one durable queue.
///
/// A publisher built with [`JetStreamPublisher::unconnected`] has no channel;
/// every publish on it fails with [`MessagingError::Connection`].
pub struct JetStreamPublisher {
    connection: RwLock<Option<Connection>>,
    queue: String,
    metrics: QueueMetrics,
}

impl JetStreamPublisher {
    /// Connect to the broker and declare the durable queue.
    pub async fn connect(config: &NatsConfig) -> Result<Self, MessagingError> {
        let client = async_nats::connect(config.url.as_str()).await?;
        let jetstream = jetstream::new(client.clone());

        ensure_stream(&jetstream, &config.queue).await?;

        info!(url = %config.url, queue = %config.queue, "Event publisher connected");

        Ok(Self {
            connection: RwLock::new(Some(Connection { client, jetstream })),
            queue: config.queue.clone(),
            metrics: QueueMetrics::new(&config.queue),
        })
    }

    /// A publisher whose channel was never established.
    pub fn unconnected(queue: impl Into<String>) -> Self {
        let queue = queue.into();
        Self {
            connection: RwLock::new(None),
            metrics: QueueMetrics::new(&queue),
            queue,
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.read().await.is_some()
    }

    /// Serialize `message` and publish it, waiting for the broker to
    /// acknowledge the persisted write.
    ///
    /// Returns the stream sequence assigned to the message.
    #[instrument(skip(self, message), fields(queue = %self.queue))]
    pub async fn publish<T: Serialize + Sync>(&self, message: &T) -> Result<u64, MessagingError> {
        let result = self.publish_inner(message).await;
        match &result {
            Ok(_) => self.metrics.published(),
            Err(_) => self.metrics.publish_failed(),
        }
        result
    }

    async fn publish_inner<T: Serialize + Sync>(&self, message: &T) -> Result<u64, MessagingError> {
        let jetstream = self
            .connection
            .read()
            .await
            .as_ref()
            .map(|c| c.jetstream.clone())
            .ok_or_else(MessagingError::not_connected)?;

        let payload = serde_json::to_vec(message)?;

        let ack = jetstream
            .publish(self.queue.clone(), payload.into())
            .await
            .map_err(MessagingError::publish_error)?
            .await
            .map_err(MessagingError::publish_error)?;

        debug!(sequence = ack.sequence, "Published message");
        Ok(ack.sequence)
    }

    /// Release the channel, then the connection. A no-op when already
    /// closed or never connected.
    pub async fn close(&self) -> Result<(), MessagingError> {
        let Some(connection) = self.connection.write().await.take() else {
            return Ok(());
        };

        drop(connection.jetstream);
        connection
            .client
            .flush()
            .await
            .map_err(MessagingError::connection_error)?;

        info!(queue = %self.queue, "Event publisher closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Note {
        text: &'static str,
    }

    #[tokio::test]
    async fn test_publish_without_channel_is_connection_error() {
        let publisher = JetStreamPublisher::unconnected("item_events");

        let err = publisher.publish(&Note { text: "hi" }).await.unwrap_err();

        assert!(err.is_connection());
        assert!(!publisher.is_connected().await);
    }

    #[tokio::test]
    async fn test_close_unconnected_publisher_is_noop() {
        let publisher = JetStreamPublisher::unconnected("item_events");

        assert!(publisher.close().await.is_ok());
        assert!(publisher.close().await.is_ok());
        assert_eq!(publisher.queue(), "item_events");
    }
}
