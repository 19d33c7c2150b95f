//! Handlebars templates for emails and chat messages.
//!
//! Templates are registered once at startup in strict mode, so a missing
//! variable fails the render instead of producing a half-empty message.

use crate::error::NotificationResult;
use crate::models::{OrderNotification, OtpEmail};
use handlebars::Handlebars;
use serde_json::json;

pub const OTP_SUBJECT: &str = "Your Verification Code";

const OTP_TEXT: &str =
    "Your OTP code is: {{otp}}. The code is valid for {{ttl_minutes}} minutes.";

const OTP_HTML: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: sans-serif;">
  <p>Hello {{name}},</p>
  <p>Your OTP code is: <strong>{{otp}}</strong>. The code is valid for {{ttl_minutes}} minutes.</p>
</body>
</html>"#;

// Telegram's HTML parse mode accepts the entities handlebars escapes to.
const ORDER_PLACED: &str = "<b>🛒 Новый заказ #{{order_id}}</b>

<b>👤 Клиент:</b> {{client_name}} {{client_surname}}
<b>📞 Телефон:</b> {{phone_number}}
<b>📍 Адрес:</b> {{#if address}}{{address}}{{else}}-{{/if}}
<b>💬 Комментарий:</b> {{#if comment}}{{comment}}{{else}}-{{/if}}
<b>📦 Продукты:</b>
{{#each lines}}- {{title}} (ID: {{#if product_id}}{{product_id}}{{else}}-{{/if}}, Price: {{unit_price}}, Qty: {{quantity}})
{{/each}}
<b>💵 Общая сумма:</b> {{total_price}}
<b>📅 Дата:</b> {{date}}
<b>📢 Статус:</b> {{status}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

pub struct TemplateEngine {
    registry: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> NotificationResult<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string("otp_html", OTP_HTML)?;
        registry.register_template_string("otp_text", OTP_TEXT)?;
        registry.register_template_string("order_placed", ORDER_PLACED)?;
        Ok(Self { registry })
    }

    pub fn render_otp(&self, data: &OtpEmail) -> NotificationResult<RenderedEmail> {
        Ok(RenderedEmail {
            subject: OTP_SUBJECT.to_string(),
            html: self.registry.render("otp_html", data)?,
            text: self.registry.render("otp_text", data)?,
        })
    }

    pub fn render_order_placed(&self, order: &OrderNotification) -> NotificationResult<String> {
        let data = json!({
            "order_id": order.order_id,
            "client_name": order.client_name,
            "client_surname": order.client_surname,
            "phone_number": order.phone_number,
            "address": order.address,
            "comment": order.comment,
            "lines": order.lines,
            "total_price": order.total_price,
            "date": order.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            "status": order.status,
        });
        Ok(self.registry.render("order_placed", &data)?)
    }
}
