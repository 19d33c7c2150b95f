//! Payloads handed to the notification channels.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Variables for the OTP verification email.
#[derive(Debug, Clone, Serialize)]
pub struct OtpEmail {
    pub name: String,
    pub otp: String,
    pub ttl_minutes: u64,
}

/// One product line of a placed order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    pub product_id: Option<Uuid>,
    pub title: String,
    pub unit_price: i32,
    pub quantity: i32,
}

/// Everything the staff chat needs to know about a new order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderNotification {
    pub order_id: Uuid,
    pub client_name: String,
    pub client_surname: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub comment: Option<String>,
    pub lines: Vec<OrderLine>,
    pub total_price: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
