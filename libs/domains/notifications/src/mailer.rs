use crate::error::NotificationResult;
use crate::providers::{EmailContent, EmailProvider, SentEmail};
use crate::templates::{TemplateEngine, VerificationEmailData};
use tracing::info;

/// Who the verification email goes to
#[derive(Debug, Clone)]
pub struct VerificationRecipient {
    pub user_id: i32,
    pub email: String,
    pub username: String,
}

/// Renders and sends the post-signup verification email.
pub struct VerificationMailer<P: EmailProvider> {
    provider: P,
    templates: TemplateEngine,
    frontend_url: String,
    product_name: String,
}

impl<P: EmailProvider> VerificationMailer<P> {
    pub fn new(provider: P, frontend_url: impl Into<String>) -> NotificationResult<Self> {
        Ok(Self {
            provider,
            templates: TemplateEngine::new()?,
            frontend_url: frontend_url.into().trim_end_matches('/').to_string(),
            product_name: "Accounts".to_string(),
        })
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }

    /// `{frontend_url}/auth/verify-email?user_id={id}`
    pub fn verification_url(&self, user_id: i32) -> String {
        format!("{}/auth/verify-email?user_id={}", self.frontend_url, user_id)
    }

    pub async fn send(&self, recipient: &VerificationRecipient) -> NotificationResult<SentEmail> {
        let rendered = self.templates.render_verification(&VerificationEmailData {
            username: recipient.username.clone(),
            verification_url: self.verification_url(recipient.user_id),
            product_name: self.product_name.clone(),
        })?;

        let sent = self
            .provider
            .send(&EmailContent {
                to_email: recipient.email.clone(),
                to_name: recipient.username.clone(),
                subject: rendered.subject,
                html_body: rendered.html,
                text_body: rendered.text,
            })
            .await?;

        info!(
            user_id = recipient.user_id,
            provider = self.provider.name(),
            message_id = ?sent.message_id,
            "Verification email sent"
        );
        Ok(sent)
    }
}
