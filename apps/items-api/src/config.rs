use core_config::{AppInfo, FromEnv, app_info, nats::NatsConfig, server::ServerConfig};

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub nats: NatsConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let nats = NatsConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            nats,
            environment,
        })
    }
}
