//! Notifications Domain
//!
//! Outbound side effects of user actions: the OTP email sent on sign-up and
//! sign-in, and the staff chat message announcing a new order.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐
//! │  Users service  │     │ Orders / Cart   │
//! └────────┬────────┘     └────────┬────────┘
//!          │ send_otp              │ order_placed (after commit)
//! ┌────────▼────────┐     ┌────────▼────────┐
//! │     Mailer      │     │  OrderNotifier  │
//! └────────┬────────┘     └────────┬────────┘
//!          │                       │
//! ┌────────▼────────┐     ┌────────▼────────┐
//! │ TemplateEngine  │     │ TemplateEngine  │
//! └────────┬────────┘     └────────┬────────┘
//!          │                       │
//! ┌────────▼────────┐     ┌────────▼────────┐
//! │ EmailProvider   │     │ Telegram Bot API│
//! │ (SMTP, memory)  │     │  (or no-op)     │
//! └─────────────────┘     └─────────────────┘
//! ```
//!
//! Both channels log failures and swallow them, so a dead SMTP server or
//! bot never fails the request that triggered the notification.

pub mod error;
pub mod mailer;
pub mod models;
pub mod providers;
pub mod telegram;
pub mod templates;

pub use error::{NotificationError, NotificationResult};
pub use mailer::Mailer;
pub use models::{OrderLine, OrderNotification, OtpEmail};
pub use providers::{EmailContent, EmailProvider, MemoryProvider, SentEmail, SmtpConfig, SmtpProvider};
pub use telegram::{NoopNotifier, OrderNotifier, TelegramConfig, TelegramNotifier, notifier_from_env};
pub use templates::{RenderedEmail, TemplateEngine};
