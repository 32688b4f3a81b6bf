//! SMTP delivery via lettre. Without TLS it targets local catchers such as
//! Mailpit; with TLS it uses the relay's STARTTLS/implicit TLS defaults.

use super::{EmailContent, EmailProvider, SentEmail};
use crate::error::{NotificationError, NotificationResult};
use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse_or, env_required};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from_email: String,
    pub from_name: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

impl SmtpConfig {
    pub fn new(host: impl Into<String>, port: u16, from_email: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            from_email: from_email.into(),
            from_name: "Accounts".to_string(),
            username: None,
            password: None,
            use_tls: false,
        }
    }

    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }

    fn sender(&self) -> NotificationResult<Mailbox> {
        Ok(Mailbox::new(
            Some(self.from_name.clone()),
            self.from_email.parse()?,
        ))
    }
}

/// - `SMTP_HOST` (required)
/// - `SMTP_PORT` (default 1025)
/// - `SMTP_FROM_EMAIL` (default noreply@localhost), `SMTP_FROM_NAME` (default Accounts)
/// - `SMTP_USERNAME`, `SMTP_PASSWORD` (optional, used only as a pair)
/// - `SMTP_USE_TLS` (default false)
impl FromEnv for SmtpConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_required("SMTP_HOST")?,
            port: env_parse_or("SMTP_PORT", 1025u16)?,
            from_email: env_or_default("SMTP_FROM_EMAIL", "noreply@localhost"),
            from_name: env_or_default("SMTP_FROM_NAME", "Accounts"),
            username: env_optional("SMTP_USERNAME"),
            password: env_optional("SMTP_PASSWORD"),
            use_tls: env_parse_or("SMTP_USE_TLS", false)?,
        })
    }
}

pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    host: String,
}

impl SmtpProvider {
    /// Builds the transport eagerly; no connection is opened until the first send.
    pub fn new(config: SmtpConfig) -> NotificationResult<Self> {
        let from = config.sender()?;
        let credentials = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user.clone(), pass.clone())),
            _ => None,
        };

        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host).map_err(|e| {
                NotificationError::ConfigError(format!("Failed to create SMTP relay: {e}"))
            })?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        }
        .port(config.port);

        if let Some(credentials) = credentials {
            builder = builder.credentials(credentials);
        }

        Ok(Self {
            transport: builder.build(),
            from,
            host: config.host,
        })
    }

    fn build_message(&self, email: &EmailContent) -> NotificationResult<Message> {
        let name = (!email.to_name.is_empty()).then(|| email.to_name.clone());
        let to = Mailbox::new(name, email.to_email.parse()?);

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                email.html_body.clone(),
            ))
            .map_err(|e| NotificationError::ProviderError(format!("Failed to build message: {e}")))
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail> {
        debug!(to = %email.to_email, subject = %email.subject, host = %self.host, "Sending email via SMTP");

        let message = self.build_message(email)?;
        let response = self.transport.send(message).await.map_err(|e| {
            error!(to = %email.to_email, error = %e, "SMTP send failed");
            NotificationError::ProviderError(format!("SMTP send failed: {e}"))
        })?;

        let message_id = response.message().next().map(str::to_string);
        info!(to = %email.to_email, message_id = ?message_id, "Email sent via SMTP");

        Ok(SentEmail {
            message_id,
            accepted: response.is_positive(),
        })
    }

    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn health_check(&self) -> NotificationResult<()> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(NotificationError::ProviderError(
                "SMTP server did not accept NOOP".to_string(),
            )),
            Err(e) => Err(NotificationError::ProviderError(format!(
                "SMTP health check failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_config_from_env_defaults() {
        temp_env::with_vars(
            [
                ("SMTP_HOST", Some("localhost")),
                ("SMTP_PORT", None),
                ("SMTP_FROM_EMAIL", None),
                ("SMTP_USERNAME", None),
                ("SMTP_PASSWORD", None),
                ("SMTP_USE_TLS", None),
            ],
            || {
                let config = SmtpConfig::from_env().unwrap();
                assert_eq!(config.port, 1025);
                assert_eq!(config.from_email, "noreply@localhost");
                assert!(config.username.is_none());
                assert!(!config.use_tls);
            },
        );
    }

    #[test]
    fn test_smtp_config_requires_host() {
        temp_env::with_var_unset("SMTP_HOST", || {
            assert!(SmtpConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_smtp_config_rejects_bad_tls_flag() {
        temp_env::with_vars(
            [("SMTP_HOST", Some("mail")), ("SMTP_USE_TLS", Some("maybe"))],
            || {
                let err = SmtpConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("SMTP_USE_TLS"));
            },
        );
    }

    #[tokio::test]
    async fn test_invalid_sender_rejected() {
        let config = SmtpConfig::new("localhost", 1025, "not an address");
        assert!(matches!(
            SmtpProvider::new(config),
            Err(NotificationError::InvalidEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_build_message_with_and_without_display_name() {
        let provider = SmtpProvider::new(SmtpConfig::new("localhost", 1025, "noreply@example.com"))
            .unwrap();

        let mut email = EmailContent {
            to_email: "alice@example.com".to_string(),
            to_name: "alice".to_string(),
            subject: "Verify".to_string(),
            html_body: "<p>hi</p>".to_string(),
            text_body: "hi".to_string(),
        };
        assert!(provider.build_message(&email).is_ok());

        email.to_name.clear();
        assert!(provider.build_message(&email).is_ok());

        email.to_email = "nope".to_string();
        assert!(provider.build_message(&email).is_err());
    }
}
