use super::{EmailContent, EmailProvider, SentEmail};
use crate::error::NotificationResult;
use async_trait::async_trait;
use std::sync::Mutex;

/// Keeps sent emails in memory. Used by tests and by local runs without an SMTP server.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    sent: Mutex<Vec<EmailContent>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<EmailContent> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last_to(&self, email: &str) -> Option<EmailContent> {
        self.sent()
            .into_iter()
            .rev()
            .find(|sent| sent.to_email == email)
    }
}

#[async_trait]
impl EmailProvider for MemoryProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail> {
        tracing::debug!(to = %email.to_email, subject = %email.subject, "Email captured in memory");
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(email.clone());
        Ok(SentEmail {
            message_id: None,
            accepted: true,
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> NotificationResult<bool> {
        Ok(true)
    }
}
