//! Durable event queue plumbing over NATS JetStream.
//!
//! A queue is a JetStream stream whose name and single subject are the queue
//! name, stored on disk and retained until a consumer acknowledges each
//! message (work-queue retention).
//!
//! ```text
//! ┌────────────────────┐     ┌─────────────────────┐     ┌────────────────────┐
//! │ JetStreamPublisher │────▶│   JetStream stream  │────▶│ JetStreamConsumer  │
//! │  (publish + ack)   │     │ (file, work-queue)  │     │ (explicit ack)     │
//! └────────────────────┘     └─────────────────────┘     └─────────┬──────────┘
//!                                                                  │
//!                                                        ┌─────────▼──────────┐
//!                                                        │   MessageHandler   │
//!                                                        └────────────────────┘
//! ```
//!
//! Per delivery the consumer decides a [`Disposition`]:
//!
//! | Outcome | Disposition | JetStream ack |
//! |---------|-------------|---------------|
//! | payload does not decode | `Discard` | `Term` |
//! | handler returns an error | `Requeue` | `Nak` |
//! | handler succeeds | `Ack` | `Ack` |
//!
//! There is no retry limit, backoff or dead-letter stream: a handler that
//! keeps failing sees the same message redelivered indefinitely.
//!
//! # Example
//!
//! ```rust,ignore
//! use core_config::nats::NatsConfig;
//! use messaging::{JetStreamConsumer, JetStreamPublisher};
//!
//! let config = NatsConfig::default();
//! let publisher = JetStreamPublisher::connect(&config).await?;
//! publisher.publish(&my_event).await?;
//!
//! let consumer = JetStreamConsumer::connect(&config).await?;
//! let worker = consumer.consume(MyHandler).await?;
//! ```

mod consumer;
mod error;
mod handler;
pub mod metrics;
mod publisher;
mod queue;

pub use consumer::JetStreamConsumer;
pub use error::MessagingError;
pub use handler::{decide, Disposition, MessageHandler};
pub use metrics::{init_metrics, render_metrics, QueueMetrics};
pub use publisher::JetStreamPublisher;
pub use queue::consumer_name;
