//! The `EmailProvider` seam and its implementations

mod recording;
mod smtp;

pub use recording::RecordingProvider;
pub use smtp::{SmtpConfig, SmtpProvider};

use crate::error::NotificationResult;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct SentEmail {
    /// Provider-specific id, when the relay hands one back
    pub message_id: Option<String>,
    pub accepted: bool,
}

/// A rendered message ready for a provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailContent {
    pub to_email: String,
    /// Display name; may be empty
    pub to_name: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail>;

    /// Short name for logs
    fn name(&self) -> &'static str;

    async fn health_check(&self) -> NotificationResult<()>;
}
