//! Notifications Domain
//!
//! Outbound email for the accounts service. Today that is one message: the
//! verification email sent right after signup.
//!
//! ```text
//! VerificationMailer ── TemplateEngine (handlebars)
//!        │
//!        ▼
//!  EmailProvider ── SmtpProvider (lettre) | RecordingProvider (tests, local dev)
//! ```
//!
//! ```rust,ignore
//! use domain_notifications::{SmtpConfig, SmtpProvider, VerificationMailer};
//!
//! let provider = SmtpProvider::new(SmtpConfig::from_env()?)?;
//! let mailer = VerificationMailer::new(provider, "https://app.example.com")?;
//! mailer.send(&VerificationRecipient { user_id: 7, email, username }).await?;
//! ```

pub mod error;
pub mod mailer;
pub mod providers;
pub mod templates;

pub use error::{NotificationError, NotificationResult};
pub use mailer::{VerificationMailer, VerificationRecipient};
pub use providers::{
    EmailContent, EmailProvider, RecordingProvider, SentEmail, SmtpConfig, SmtpProvider,
};
pub use templates::{RenderedEmail, TemplateEngine, VerificationEmailData};
