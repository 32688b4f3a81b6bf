use super::{EmailContent, EmailProvider, SentEmail};
use crate::error::{NotificationError, NotificationResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Keeps every "sent" email in memory instead of delivering it.
///
/// Clones share the same outbox, so a test can hand one clone to the code
/// under test and inspect the other.
#[derive(Clone, Default)]
pub struct RecordingProvider {
    outbox: Arc<Mutex<Vec<EmailContent>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose every send fails
    pub fn failing() -> Self {
        let provider = Self::new();
        provider.set_failing(true);
        provider
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<EmailContent> {
        self.outbox.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.outbox.lock().await.len()
    }

    pub async fn was_sent_to(&self, email: &str) -> bool {
        self.outbox.lock().await.iter().any(|e| e.to_email == email)
    }
}

#[async_trait]
impl EmailProvider for RecordingProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotificationError::ProviderError(
                "recording provider set to fail".to_string(),
            ));
        }

        let mut outbox = self.outbox.lock().await;
        outbox.push(email.clone());

        Ok(SentEmail {
            message_id: Some(format!("recorded-{}", outbox.len())),
            accepted: true,
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }

    async fn health_check(&self) -> NotificationResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotificationError::ProviderError("unhealthy".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &str) -> EmailContent {
        EmailContent {
            to_email: to.to_string(),
            subject: "hello".to_string(),
            ..EmailContent::default()
        }
    }

    #[tokio::test]
    async fn test_clones_share_outbox() {
        let provider = RecordingProvider::new();
        let handle = provider.clone();

        provider.send(&email("alice@example.com")).await.unwrap();

        assert_eq!(handle.sent_count().await, 1);
        assert!(handle.was_sent_to("alice@example.com").await);
        assert!(!handle.was_sent_to("bob@example.com").await);
    }

    #[tokio::test]
    async fn test_failing_provider_records_nothing() {
        let provider = RecordingProvider::failing();

        assert!(provider.send(&email("alice@example.com")).await.is_err());
        assert!(provider.health_check().await.is_err());
        assert_eq!(provider.sent_count().await, 0);

        provider.set_failing(false);
        assert!(provider.send(&email("alice@example.com")).await.is_ok());
    }
}
