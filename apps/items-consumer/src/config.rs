//! Configuration for the item events consumer

use core_config::{AppInfo, Environment, FromEnv, app_info, nats::NatsConfig};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppInfo,
    pub nats: NatsConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            nats: NatsConfig::from_env()?,
            environment: Environment::from_env(),
        })
    }
}
