use core_config::{AppInfo, FromEnv, app_info, env_optional, env_or_default, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_notifications::SmtpConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    /// `None` when `DATABASE_URL` is unset: accounts live in memory
    pub database: Option<PostgresConfig>,
    /// `None` when `SMTP_HOST` is unset: verification requests are only logged
    pub smtp: Option<SmtpConfig>,
    /// Base of the link in verification emails
    pub frontend_url: String,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080

        let database = match env_optional("DATABASE_URL") {
            Some(_) => Some(PostgresConfig::from_env()?),
            None => None,
        };

        let smtp = match env_optional("SMTP_HOST") {
            Some(_) => Some(SmtpConfig::from_env()?),
            None => None,
        };

        Ok(Self {
            app: app_info!(),
            database,
            smtp,
            frontend_url: env_or_default("FRONTEND_URL", "http://localhost:3000"),
            server,
            environment,
        })
    }
}
