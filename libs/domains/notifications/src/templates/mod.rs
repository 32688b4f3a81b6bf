//! Handlebars templates for outgoing mail

use crate::error::NotificationResult;
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

const VERIFICATION_HTML: &str = "verification_html";
const VERIFICATION_TEXT: &str = "verification_text";

#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Values interpolated into the verification email
#[derive(Debug, Clone, Serialize)]
pub struct VerificationEmailData {
    pub username: String,
    pub verification_url: String,
    pub product_name: String,
}

/// Cheap to clone; the registry is shared.
#[derive(Clone)]
pub struct TemplateEngine {
    handlebars: Arc<Handlebars<'static>>,
}

impl TemplateEngine {
    pub fn new() -> NotificationResult<Self> {
        let mut handlebars = Handlebars::new();
        // A missing variable is a bug, not an empty string
        handlebars.set_strict_mode(true);
        handlebars.register_template_string(VERIFICATION_HTML, VERIFICATION_HTML_TEMPLATE)?;
        handlebars.register_template_string(VERIFICATION_TEXT, VERIFICATION_TEXT_TEMPLATE)?;

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> NotificationResult<String> {
        Ok(self.handlebars.render(name, data)?)
    }

    pub fn render_verification(
        &self,
        data: &VerificationEmailData,
    ) -> NotificationResult<RenderedEmail> {
        debug!(username = %data.username, "Rendering verification email");

        Ok(RenderedEmail {
            subject: format!("Verify your {} account", data.product_name),
            html: self.render(VERIFICATION_HTML, data)?,
            text: self.render(VERIFICATION_TEXT, data)?,
        })
    }
}

const VERIFICATION_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Confirm your email</title>
</head>
<body style="margin: 0; padding: 24px; font-family: system-ui, sans-serif; background-color: #f5f5f4;">
  <div style="max-width: 560px; margin: 0 auto; background: #ffffff; border-radius: 6px; padding: 32px;">
    <h1 style="font-size: 22px; color: #1c1917; margin: 0 0 16px 0;">Welcome, {{username}}</h1>
    <p style="font-size: 15px; line-height: 22px; color: #44403c;">
      Thanks for signing up for {{product_name}}. Confirm this address to finish setting up your account.
    </p>
    <p style="text-align: center; margin: 28px 0;">
      <a href="{{verification_url}}" style="background: #0f766e; color: #ffffff; padding: 12px 28px; border-radius: 4px; text-decoration: none;">
        Confirm email
      </a>
    </p>
    <p style="font-size: 13px; color: #78716c;">
      Button not working? Paste this link into your browser:<br>
      <span style="word-break: break-all;">{{verification_url}}</span>
    </p>
    <p style="font-size: 13px; color: #78716c;">If you did not create an account you can ignore this message.</p>
  </div>
</body>
</html>"#;

// Plain text must not be HTML-escaped
const VERIFICATION_TEXT_TEMPLATE: &str = r#"Welcome, {{{username}}}

Thanks for signing up for {{{product_name}}}. Confirm this address to finish setting up your account:

{{{verification_url}}}

If you did not create an account you can ignore this message."#;
