//! Message handler seam and the per-delivery acknowledgment decision.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Caller-supplied logic invoked for every decoded message.
///
/// Returning an error requeues the message. Redelivery has no limit, so
/// handlers must tolerate seeing the same message more than once.
#[async_trait]
pub trait MessageHandler<M>: Send + Sync {
    async fn handle(&self, message: M) -> eyre::Result<()>;

    /// Used for logging and metrics labels.
    fn name(&self) -> &'static str {
        "handler"
    }
}

/// What the consumer tells the broker about a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Processed; remove from the queue
    Ack,
    /// Handler failed; redeliver
    Requeue,
    /// Undecodable; drop permanently
    Discard,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Ack => "ack",
            Disposition::Requeue => "requeue",
            Disposition::Discard => "discard",
        }
    }
}

/// Decode `payload` and run `handler`, returning how the delivery should be
/// acknowledged.
pub async fn decide<M, H>(payload: &[u8], handler: &H) -> Disposition
where
    M: DeserializeOwned,
    H: MessageHandler<M> + ?Sized,
{
    let message: M = match serde_json::from_slice(payload) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, handler = handler.name(), "Failed to decode message, discarding");
            return Disposition::Discard;
        }
    };

    match handler.handle(message).await {
        Ok(()) => Disposition::Ack,
        Err(e) => {
            warn!(error = %e, handler = handler.name(), "Handler failed, requeueing message");
            Disposition::Requeue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        seq: u32,
    }

    struct Recording {
        seen: Mutex<Vec<u32>>,
        fail: bool,
    }

    impl Recording {
        fn new(fail: bool) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl MessageHandler<Ping> for Recording {
        async fn handle(&self, message: Ping) -> eyre::Result<()> {
            self.seen.lock().unwrap().push(message.seq);
            if self.fail {
                eyre::bail!("downstream unavailable");
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_decoded_message_is_acked() {
        let handler = Recording::new(false);
        let disposition = decide::<Ping, _>(br#"{"seq":7}"#, &handler).await;

        assert_eq!(disposition, Disposition::Ack);
        assert_eq!(*handler.seen.lock().unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_handler_error_requeues() {
        let handler = Recording::new(true);
        let disposition = decide::<Ping, _>(br#"{"seq":1}"#, &handler).await;

        assert_eq!(disposition, Disposition::Requeue);
        assert_eq!(*handler.seen.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_discarded_without_calling_handler() {
        let handler = Recording::new(false);
        let disposition = decide::<Ping, _>(b"not json", &handler).await;

        assert_eq!(disposition, Disposition::Discard);
        assert!(handler.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_disposition_labels() {
        assert_eq!(Disposition::Ack.as_str(), "ack");
        assert_eq!(Disposition::Requeue.as_str(), "requeue");
        assert_eq!(Disposition::Discard.as_str(), "discard");
    }
}
