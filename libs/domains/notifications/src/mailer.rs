use crate::models::OtpEmail;
use crate::providers::{EmailContent, EmailProvider};
use crate::templates::TemplateEngine;
use std::sync::Arc;
use tracing::{info, warn};

/// Renders and sends transactional emails.
///
/// Delivery is best effort: failures are logged and never reach the caller.
#[derive(Clone)]
pub struct Mailer {
    provider: Arc<dyn EmailProvider>,
    templates: Arc<TemplateEngine>,
    otp_ttl_minutes: u64,
}

impl Mailer {
    pub fn new(
        provider: Arc<dyn EmailProvider>,
        templates: Arc<TemplateEngine>,
        otp_ttl_secs: u64,
    ) -> Self {
        Self {
            provider,
            templates,
            otp_ttl_minutes: otp_ttl_secs.div_ceil(60),
        }
    }

    pub async fn send_otp(&self, email: &str, name: &str, otp: &str) {
        let data = OtpEmail {
            name: name.to_string(),
            otp: otp.to_string(),
            ttl_minutes: self.otp_ttl_minutes,
        };

        let rendered = match self.templates.render_otp(&data) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!(to = %email, error = %e, "Failed to render OTP email");
                return;
            }
        };

        let content = EmailContent {
            to_email: email.to_string(),
            to_name: name.to_string(),
            subject: rendered.subject,
            html_body: rendered.html,
            text_body: rendered.text,
        };

        match self.provider.send(&content).await {
            Ok(_) => info!(to = %email, provider = self.provider.name(), "OTP email sent"),
            Err(e) => warn!(
                to = %email,
                provider = self.provider.name(),
                error = %e,
                "Failed to send OTP email"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotificationError;
    use crate::providers::{MemoryProvider, MockEmailProvider};

    #[tokio::test]
    async fn test_send_otp_delivers_rendered_email() {
        let provider = Arc::new(MemoryProvider::new());
        let mailer = Mailer::new(provider.clone(), Arc::new(TemplateEngine::new().unwrap()), 300);

        mailer.send_otp("aziz@example.com", "Aziz", "654321").await;

        let sent = provider.last_to("aziz@example.com").unwrap();
        assert_eq!(sent.subject, "Your Verification Code");
        assert_eq!(
            sent.text_body,
            "Your OTP code is: 654321. The code is valid for 5 minutes."
        );
        assert_eq!(sent.to_name, "Aziz");
    }

    #[tokio::test]
    async fn test_send_otp_swallows_provider_failure() {
        let mut provider = MockEmailProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_send()
            .times(1)
            .returning(|_| Err(NotificationError::ProviderError("connection refused".into())));

        let mailer = Mailer::new(Arc::new(provider), Arc::new(TemplateEngine::new().unwrap()), 300);
        mailer.send_otp("aziz@example.com", "Aziz", "111111").await;
    }

    #[test]
    fn test_ttl_rounds_up_to_minutes() {
        let mailer = Mailer::new(
            Arc::new(MemoryProvider::new()),
            Arc::new(TemplateEngine::new().unwrap()),
            90,
        );
        assert_eq!(mailer.otp_ttl_minutes, 2);
    }
}
