//! Durable queue declaration shared by publishers and consumers.

use crate::error::MessagingError;
use async_nats::jetstream::consumer::pull::Config as PullConfig;
use async_nats::jetstream::consumer::{AckPolicy, Consumer};
use async_nats::jetstream::stream::{Config as StreamConfig, RetentionPolicy, StorageType, Stream};
use async_nats::jetstream::Context;
use tracing::{debug, info};

/// Durable consumer name used for a queue.
pub fn consumer_name(queue: &str) -> String {
    format!("{}-consumer", queue)
}

pub(crate) fn stream_config(queue: &str) -> StreamConfig {
    StreamConfig {
        name: queue.to_string(),
        subjects: vec![queue.to_string()],
        storage: StorageType::File,
        retention: RetentionPolicy::WorkQueue,
        ..Default::default()
    }
}

/// Declare the queue's stream, creating it if it does not exist yet.
pub(crate) async fn ensure_stream(
    jetstream: &Context,
    queue: &str,
) -> Result<Stream, MessagingError> {
    match jetstream.get_stream(queue).await {
        Ok(stream) => {
            debug!(queue = %queue, "Queue already declared");
            Ok(stream)
        }
        Err(_) => {
            info!(queue = %queue, "Declaring durable queue");
            jetstream
                .create_stream(stream_config(queue))
                .await
                .map_err(MessagingError::declare_error)
        }
    }
}

/// Declare the explicit-ack durable consumer for the queue.
pub(crate) async fn ensure_consumer(
    stream: &Stream,
    queue: &str,
) -> Result<Consumer<PullConfig>, MessagingError> {
    let durable = consumer_name(queue);

    match stream.get_consumer::<PullConfig>(&durable).await {
        Ok(consumer) => {
            debug!(consumer = %durable, "Consumer already exists");
            Ok(consumer)
        }
        Err(_) => {
            info!(consumer = %durable, queue = %queue, "Creating durable consumer");
            stream
                .create_consumer(PullConfig {
                    durable_name: Some(durable.clone()),
                    name: Some(durable),
                    ack_policy: AckPolicy::Explicit,
                    ..Default::default()
                })
                .await
                .map_err(MessagingError::consumer_error)
        }
    }
}
