use chrono::{DateTime, Utc};
use domain_catalog::ProductSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// One cart per user, created on first access.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A cart item joined with its product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub product: ProductSummary,
    pub quantity: i32,
    pub total_price: i64,
}

impl CartLine {
    pub fn new(id: Uuid, product: ProductSummary, quantity: i32) -> Self {
        let total_price = i64::from(product.price) * i64::from(quantity);
        Self {
            id,
            product,
            quantity,
            total_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartView {
    pub id: Uuid,
    pub items: Vec<CartLine>,
    pub total_price: i64,
}

impl CartView {
    pub fn new(id: Uuid, items: Vec<CartLine>) -> Self {
        let total_price = items.iter().map(|line| line.total_price).sum();
        Self {
            id,
            items,
            total_price,
        }
    }
}

fn one() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddToCart {
    pub product_id: Uuid,
    #[serde(default = "one")]
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItem {
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}
