use crate::{env_or_default, ConfigError, FromEnv};

/// Default broker endpoint for a local NATS server.
pub const DEFAULT_NATS_URL: &str = "nats://localhost:4222";

/// Default durable queue carrying item events.
pub const DEFAULT_EVENTS_QUEUE: &str = "item_events";

/// NATS broker connection settings shared by publishers and consumers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NatsConfig {
    /// Broker connection URL
    pub url: String,
    /// Durable queue (JetStream stream and subject) name
    pub queue: String,
}

impl NatsConfig {
    pub fn new(url: impl Into<String>, queue: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            queue: queue.into(),
        }
    }
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NATS_URL, DEFAULT_EVENTS_QUEUE)
    }
}

impl FromEnv for NatsConfig {
    /// Reads:
    /// - NATS_URL: defaults to nats://localhost:4222
    /// - ITEM_EVENTS_QUEUE: defaults to item_events
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_or_default("NATS_URL", DEFAULT_NATS_URL);
        let queue = env_or_default("ITEM_EVENTS_QUEUE", DEFAULT_EVENTS_QUEUE);

        if queue.trim().is_empty() {
            return Err(ConfigError::ParseError {
                key: "ITEM_EVENTS_QUEUE".to_string(),
                details: "queue name cannot be empty".to_string(),
            });
        }

        Ok(Self { url, queue })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nats_config_defaults() {
        temp_env::with_vars(
            [("NATS_URL", None::<&str>), ("ITEM_EVENTS_QUEUE", None::<&str>)],
            || {
                let config = NatsConfig::from_env().unwrap();
                assert_eq!(config, NatsConfig::default());
                assert_eq!(config.url, "nats://localhost:4222");
                assert_eq!(config.queue, "item_events");
            },
        );
    }

    #[test]
    fn test_nats_config_custom_url() {
        temp_env::with_vars(
            [
                ("NATS_URL", Some("nats://broker:4222")),
                ("ITEM_EVENTS_QUEUE", Some("items_test")),
            ],
            || {
                let config = NatsConfig::from_env().unwrap();
                assert_eq!(config.url, "nats://broker:4222");
                assert_eq!(config.queue, "items_test");
            },
        );
    }

    #[test]
    fn test_nats_config_rejects_blank_queue() {
        temp_env::with_var("ITEM_EVENTS_QUEUE", Some("  "), || {
            let err = NatsConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("ITEM_EVENTS_QUEUE"));
        });
    }
}
