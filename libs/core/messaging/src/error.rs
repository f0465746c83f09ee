//! Error types for queue operations.

use thiserror::Error;

/// Error that can occur while talking to the broker.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// Broker unreachable, or the publisher/consumer was never connected
    #[error("broker connection error: {0}")]
    Connection(String),

    /// Stream declaration failed
    #[error("queue declaration error: {0}")]
    Declare(String),

    /// Broker rejected or never acknowledged a publish
    #[error("publish error: {0}")]
    Publish(String),

    /// Subscription or acknowledgment failure on the consumer side
    #[error("consumer error: {0}")]
    Consumer(String),

    /// Envelope could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MessagingError {
    pub(crate) fn not_connected() -> Self {
        Self::Connection("channel is not initialized".to_string())
    }

    pub(crate) fn connection_error(error: impl std::fmt::Display) -> Self {
        Self::Connection(error.to_string())
    }

    pub(crate) fn declare_error(error: impl std::fmt::Display) -> Self {
        Self::Declare(error.to_string())
    }

    pub(crate) fn publish_error(error: impl std::fmt::Display) -> Self {
        Self::Publish(error.to_string())
    }

    pub(crate) fn consumer_error(error: impl std::fmt::Display) -> Self {
        Self::Consumer(error.to_string())
    }

    /// True when the failure means no broker channel exists.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl From<async_nats::ConnectError> for MessagingError {
    fn from(error: async_nats::ConnectError) -> Self {
        Self::connection_error(error)
    }
}
