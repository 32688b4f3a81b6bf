use async_trait::async_trait;

use crate::error::UserResult;
use crate::models::User;

/// Triggers the verification message for a newly created user.
///
/// Failures are reported as `UserError::Notification`; the service treats
/// them as non-fatal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationSender: Send + Sync {
    async fn send_verification(&self, user: &User) -> UserResult<()>;
}

/// Sender used when no mail transport is configured
#[derive(Debug, Clone, Default)]
pub struct LoggingVerificationSender;

#[async_trait]
impl VerificationSender for LoggingVerificationSender {
    async fn send_verification(&self, user: &User) -> UserResult<()> {
        tracing::info!(
            user_id = user.id,
            email = %user.email,
            "Verification requested (no mail transport configured)"
        );
        Ok(())
    }
}

#[cfg(feature = "notifications")]
pub use email::EmailVerificationSender;

#[cfg(feature = "notifications")]
mod email {
    use super::*;
    use crate::error::UserError;
    use domain_notifications::{EmailProvider, VerificationMailer, VerificationRecipient};

    /// Sends the verification email through a `domain_notifications` provider
    pub struct EmailVerificationSender<P: EmailProvider> {
        mailer: VerificationMailer<P>,
    }

    impl<P: EmailProvider> EmailVerificationSender<P> {
        pub fn new(mailer: VerificationMailer<P>) -> Self {
            Self { mailer }
        }
    }

    #[async_trait]
    impl<P: EmailProvider> VerificationSender for EmailVerificationSender<P> {
        async fn send_verification(&self, user: &User) -> UserResult<()> {
            let recipient = VerificationRecipient {
                user_id: user.id,
                email: user.email.clone(),
                username: user.username.clone(),
            };

            self.mailer
                .send(&recipient)
                .await
                .map(|_| ())
                .map_err(|e| UserError::Notification(e.to_string()))
        }
    }
}
