//! Order notifications for the staff Telegram chat.

use crate::error::{NotificationError, NotificationResult};
use crate::models::OrderNotification;
use crate::templates::TemplateEngine;
use async_trait::async_trait;
use core_config::{env_optional, env_or_default};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const TELEGRAM_API: &str = "https://api.telegram.org";

#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// Announces a committed order. Never fails from the caller's view.
    async fn order_placed(&self, order: OrderNotification);
}

/// Bot credentials. Absent when `TELEGRAM_BOT_TOKEN` or `TELEGRAM_CHAT_ID` is unset.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

impl TelegramConfig {
    pub fn from_env() -> Option<Self> {
        Some(Self {
            bot_token: env_optional("TELEGRAM_BOT_TOKEN")?,
            chat_id: env_optional("TELEGRAM_CHAT_ID")?,
            api_base: env_or_default("TELEGRAM_API_BASE", TELEGRAM_API),
        })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    config: TelegramConfig,
    templates: Arc<TemplateEngine>,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig, templates: Arc<TemplateEngine>) -> NotificationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            config,
            templates,
        })
    }

    async fn send(&self, order: &OrderNotification) -> NotificationResult<()> {
        let text = self.templates.render_order_placed(order)?;
        let payload = SendMessage {
            chat_id: &self.config.chat_id,
            text: &text,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(self.config.send_message_url())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::TelegramError(format!("{status}: {body}")));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderNotifier for TelegramNotifier {
    async fn order_placed(&self, order: OrderNotification) {
        match self.send(&order).await {
            Ok(()) => info!(order_id = %order.order_id, "Order notification sent to Telegram"),
            Err(e) => warn!(
                order_id = %order.order_id,
                error = %e,
                "Failed to send order notification"
            ),
        }
    }
}

/// Used when no bot is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl OrderNotifier for NoopNotifier {
    async fn order_placed(&self, order: OrderNotification) {
        tracing::debug!(order_id = %order.order_id, "Telegram not configured, skipping order notification");
    }
}

/// Picks the Telegram notifier when credentials are present, the no-op one otherwise.
pub fn notifier_from_env(templates: Arc<TemplateEngine>) -> NotificationResult<Arc<dyn OrderNotifier>> {
    match TelegramConfig::from_env() {
        Some(config) => Ok(Arc::new(TelegramNotifier::new(config, templates)?)),
        None => {
            info!("TELEGRAM_BOT_TOKEN/TELEGRAM_CHAT_ID not set, order notifications disabled");
            Ok(Arc::new(NoopNotifier))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn order() -> OrderNotification {
        OrderNotification {
            order_id: Uuid::now_v7(),
            client_name: "Aziz".to_string(),
            client_surname: "Karimov".to_string(),
            phone_number: "+998901234567".to_string(),
            address: None,
            comment: None,
            lines: vec![],
            total_price: 0,
            status: "pending".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_config_requires_token_and_chat() {
        temp_env::with_vars(
            [
                ("TELEGRAM_BOT_TOKEN", Some("123:abc")),
                ("TELEGRAM_CHAT_ID", None::<&str>),
            ],
            || assert!(TelegramConfig::from_env().is_none()),
        );
    }

    #[test]
    fn test_send_message_url() {
        temp_env::with_vars(
            [
                ("TELEGRAM_BOT_TOKEN", Some("123:abc")),
                ("TELEGRAM_CHAT_ID", Some("-100200")),
                ("TELEGRAM_API_BASE", None),
            ],
            || {
                let config = TelegramConfig::from_env().unwrap();
                assert_eq!(config.chat_id, "-100200");
                assert_eq!(
                    config.send_message_url(),
                    "https://api.telegram.org/bot123:abc/sendMessage"
                );
            },
        );
    }

    #[test]
    fn test_payload_uses_html_parse_mode() {
        let payload = SendMessage {
            chat_id: "-100200",
            text: "<b>hi</b>",
            parse_mode: "HTML",
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["chat_id"], "-100200");
        assert_eq!(value["parse_mode"], "HTML");
        assert_eq!(value["text"], "<b>hi</b>");
    }

    #[tokio::test]
    async fn test_unreachable_api_is_swallowed() {
        let config = TelegramConfig {
            bot_token: "123:abc".to_string(),
            chat_id: "1".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
        };
        let notifier =
            TelegramNotifier::new(config, Arc::new(TemplateEngine::new().unwrap())).unwrap();

        assert!(notifier.send(&order()).await.is_err());
        notifier.order_placed(order()).await;
    }

    #[tokio::test]
    async fn test_noop_notifier() {
        NoopNotifier.order_placed(order()).await;
    }
}
