//! JetStream consumer that drives a [`MessageHandler`] with manual acks.

use crate::error::MessagingError;
use crate::handler::{decide, Disposition, MessageHandler};
use crate::metrics::QueueMetrics;
use crate::queue::{consumer_name, ensure_consumer, ensure_stream};
use async_nats::jetstream::consumer::pull::Config as PullConfig;
use async_nats::jetstream::consumer::Consumer;
use async_nats::jetstream::{self, AckKind, Message};
use async_nats::Client;
use core_config::nats::NatsConfig;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

struct Connection {
    client: Client,
    consumer: Consumer<PullConfig>,
}

/// Consumes one durable queue. Owned by a single task.
pub struct JetStreamConsumer {
    connection: Option<Connection>,
    queue: String,
    metrics: QueueMetrics,
}

impl JetStreamConsumer {
    /// Connect, declare the queue and its durable explicit-ack consumer.
    pub async fn connect(config: &NatsConfig) -> Result<Self, MessagingError> {
        let client = async_nats::connect(config.url.as_str()).await?;
        let jetstream = jetstream::new(client.clone());

        let stream = ensure_stream(&jetstream, &config.queue).await?;
        let consumer = ensure_consumer(&stream, &config.queue).await?;

        info!(
            url = %config.url,
            queue = %config.queue,
            consumer = %consumer_name(&config.queue),
            "Event consumer connected"
        );

        Ok(Self {
            connection: Some(Connection { client, consumer }),
            queue: config.queue.clone(),
            metrics: QueueMetrics::new(&config.queue),
        })
    }

    /// A consumer whose channel was never established.
    pub fn unconnected(queue: impl Into<String>) -> Self {
        let queue = queue.into();
        Self {
            connection: None,
            metrics: QueueMetrics::new(&queue),
            queue,
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Register the subscription and spawn the delivery loop.
    ///
    /// The loop runs until the subscription ends or the returned handle is
    /// aborted.
    pub async fn consume<M, H>(&self, handler: H) -> Result<JoinHandle<()>, MessagingError>
    where
        M: DeserializeOwned + Send + 'static,
        H: MessageHandler<M> + 'static,
    {
        let connection = self
            .connection
            .as_ref()
            .ok_or_else(MessagingError::not_connected)?;

        let mut messages = connection
            .consumer
            .messages()
            .await
            .map_err(MessagingError::consumer_error)?;

        let handler = Arc::new(handler);
        let metrics = self.metrics.clone();
        let queue = self.queue.clone();

        info!(queue = %queue, handler = handler.name(), "Consumer started, waiting for messages");

        Ok(tokio::spawn(async move {
            while let Some(delivery) = messages.next().await {
                let message = match delivery {
                    Ok(message) => message,
                    Err(e) => {
                        warn!(error = %e, queue = %queue, "Error receiving message");
                        continue;
                    }
                };

                let disposition = decide::<M, H>(&message.payload, handler.as_ref()).await;
                metrics.delivered(disposition);

                if let Err(e) = settle(&message, disposition).await {
                    error!(error = %e, queue = %queue, "Failed to acknowledge message");
                }
            }

            info!(queue = %queue, "Subscription ended");
        }))
    }

    /// Release the consumer, then the connection. Idempotent.
    pub async fn close(&mut self) -> Result<(), MessagingError> {
        let Some(connection) = self.connection.take() else {
            return Ok(());
        };

        drop(connection.consumer);
        connection
            .client
            .flush()
            .await
            .map_err(MessagingError::connection_error)?;

        info!(queue = %self.queue, "Event consumer closed");
        Ok(())
    }
}

/// JetStream acknowledgement for a disposition. `Nak` redelivers at once.
fn ack_kind(disposition: Disposition) -> AckKind {
    match disposition {
        Disposition::Ack => AckKind::Ack,
        Disposition::Requeue => AckKind::Nak(None),
        Disposition::Discard => AckKind::Term,
    }
}

async fn settle(message: &Message, disposition: Disposition) -> Result<(), MessagingError> {
    let result = message.ack_with(ack_kind(disposition)).await;

    debug!(disposition = disposition.as_str(), "Settled delivery");
    result.map_err(MessagingError::consumer_error)
}
