use core_config::{
    AppInfo, FromEnv, app_info, env_or_default, env_parse_optional, server::ServerConfig,
};
use database::mongodb::MongoConfig;
use std::time::Duration;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Collection holding user documents (`USERS_COLLECTION`, default `users`)
    pub collection: String,
    /// Per-operation store deadline (`USERS_STORE_TIMEOUT_SECS`); unset or 0 means none
    pub store_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        let collection =
            env_or_default("USERS_COLLECTION", domain_users::mongodb::DEFAULT_COLLECTION);
        let store_timeout = env_parse_optional::<u64>("USERS_STORE_TIMEOUT_SECS")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            collection,
            store_timeout,
        })
    }
}
