use core_config::{ConfigError, FromEnv, env_parse_or, env_required};
use sea_orm::ConnectOptions;
use std::time::Duration;

/// Pool settings for the accounts database
///
/// Only `url` is mandatory; the rest default to values sized for a single
/// API replica.
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    /// Emit every statement through `tracing` (noisy, off in production)
    pub sqlx_logging: bool,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout: Duration::from_secs(8),
            acquire_timeout: Duration::from_secs(8),
            idle_timeout: Duration::from_secs(300),
            sqlx_logging: false,
        }
    }

    pub fn with_pool_size(mut self, max_connections: u32, min_connections: u32) -> Self {
        self.max_connections = max_connections;
        self.min_connections = min_connections.min(max_connections);
        self
    }

    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .sqlx_logging(self.sqlx_logging);
        opt
    }
}

/// - `DATABASE_URL` (required)
/// - `DB_MAX_CONNECTIONS` (default 20), `DB_MIN_CONNECTIONS` (default 2)
/// - `DB_CONNECT_TIMEOUT_SECS`, `DB_ACQUIRE_TIMEOUT_SECS` (default 8)
/// - `DB_IDLE_TIMEOUT_SECS` (default 300)
/// - `DB_SQLX_LOGGING` (default false)
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_required("DATABASE_URL")?;
        let defaults = Self::new(url);

        let max_connections = env_parse_or("DB_MAX_CONNECTIONS", defaults.max_connections)?;
        let min_connections = env_parse_or("DB_MIN_CONNECTIONS", defaults.min_connections)?;

        Ok(Self {
            connect_timeout: Duration::from_secs(env_parse_or("DB_CONNECT_TIMEOUT_SECS", 8u64)?),
            acquire_timeout: Duration::from_secs(env_parse_or("DB_ACQUIRE_TIMEOUT_SECS", 8u64)?),
            idle_timeout: Duration::from_secs(env_parse_or("DB_IDLE_TIMEOUT_SECS", 300u64)?),
            sqlx_logging: env_parse_or("DB_SQLX_LOGGING", false)?,
            ..defaults.with_pool_size(max_connections, min_connections)
        })
    }
}
