use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub rate_limit: RateLimitSettings,
    pub redis: RedisSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    /// Fixed session lifetime from issuance. Sessions are never renewed.
    pub ttl_secs: u64,
    /// How often clients are expected to re-check their stored session.
    pub revalidate_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitSettings {
    /// Failed redemption attempts allowed per (client, code) key.
    pub max_attempts: u32,
    /// Trailing window over which attempts are counted.
    pub window_secs: u64,
    /// "memory" for a process-local store, "redis" for a shared one.
    pub backend: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisSettings {
    pub url: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("SITEDESK"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "sitedesk")?
            .set_default("session.ttl_secs", 86400)?
            .set_default("session.revalidate_interval_secs", 300)?
            .set_default("rate_limit.max_attempts", 5)?
            .set_default("rate_limit.window_secs", 3600)?
            .set_default("rate_limit.backend", "memory")?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .build()?;

        config.try_deserialize()
    }
}
