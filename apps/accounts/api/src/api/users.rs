use axum::Router;
use domain_notifications::{SmtpProvider, VerificationMailer};
use domain_users::{
    EmailVerificationSender, InMemoryUserRepository, LoggingVerificationSender, PgUserRepository,
    UserService, VerificationSender, handlers,
};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

/// Postgres-backed when a pool is configured, in-memory otherwise
pub fn router(state: &AppState) -> Router {
    let sender = Arc::clone(&state.sender);

    match &state.db {
        Some(db) => handlers::router(UserService::new(PgUserRepository::new(db.clone()), sender)),
        None => handlers::router(UserService::new(InMemoryUserRepository::new(), sender)),
    }
}

/// SMTP delivery when `SMTP_HOST` is set, log-only otherwise
pub fn verification_sender(config: &Config) -> eyre::Result<Arc<dyn VerificationSender>> {
    let Some(smtp) = config.smtp.clone() else {
        info!("SMTP not configured, verification emails will only be logged");
        return Ok(Arc::new(LoggingVerificationSender));
    };

    info!(host = %smtp.host, port = smtp.port, "Sending verification emails via SMTP");
    let provider = SmtpProvider::new(smtp)?;
    let mailer = VerificationMailer::new(provider, &config.frontend_url)?;

    Ok(Arc::new(EmailVerificationSender::new(mailer)))
}
