use chrono::{DateTime, Utc};
use domain_notifications::{OrderLine, OrderNotification};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::Display;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{OrderError, OrderResult};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
pub enum OrderStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "shipping")]
    Shipping,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// pending → shipping | cancelled, shipping → delivered | cancelled.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Shipping)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Shipping, OrderStatus::Delivered)
                | (OrderStatus::Shipping, OrderStatus::Cancelled)
        )
    }
}

/// Snapshot of a product at the moment the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    /// Cleared when the product is deleted from the catalog.
    pub product_id: Option<Uuid>,
    pub product_title: String,
    pub unit_price: i32,
    pub quantity: i32,
}

impl OrderItem {
    pub fn total_price(&self) -> i64 {
        i64::from(self.unit_price) * i64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub address: Option<String>,
    pub comment: Option<String>,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn notification(&self, customer: &Customer) -> OrderNotification {
        OrderNotification {
            order_id: self.id,
            client_name: customer.name.clone(),
            client_surname: customer.surname.clone(),
            phone_number: customer.phone_number.clone(),
            address: self.address.clone(),
            comment: self.comment.clone(),
            lines: self
                .items
                .iter()
                .map(|item| OrderLine {
                    product_id: item.product_id,
                    title: item.product_title.clone(),
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                })
                .collect(),
            total_price: self.total_price,
            status: self.status.to_string(),
            created_at: self.created_at,
        }
    }
}

/// Contact details of the customer, for the staff notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub name: String,
    pub surname: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Body of `POST /orders/create`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub product_ids: Vec<OrderLineRequest>,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// An order ready to be placed: lines merged per product, keyed in lock order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub lines: BTreeMap<Uuid, i32>,
    pub address: String,
    pub comment: Option<String>,
}

impl NewOrder {
    pub fn new(
        lines: impl IntoIterator<Item = (Uuid, i32)>,
        address: String,
        comment: Option<String>,
    ) -> OrderResult<Self> {
        Ok(Self {
            lines: merge_lines(lines)?,
            address,
            comment,
        })
    }
}

impl TryFrom<CreateOrderRequest> for NewOrder {
    type Error = OrderError;

    fn try_from(request: CreateOrderRequest) -> OrderResult<Self> {
        NewOrder::new(
            request
                .product_ids
                .into_iter()
                .map(|line| (line.product_id, line.quantity)),
            request.address,
            request.comment,
        )
    }
}

/// Sums repeated products. Rejects empty orders and non-positive quantities.
pub fn merge_lines(lines: impl IntoIterator<Item = (Uuid, i32)>) -> OrderResult<BTreeMap<Uuid, i32>> {
    let mut merged = BTreeMap::new();
    for (product_id, quantity) in lines {
        if quantity <= 0 {
            return Err(OrderError::InvalidQuantity(product_id));
        }
        let entry = merged.entry(product_id).or_insert(0i32);
        *entry = entry.saturating_add(quantity);
    }
    if merged.is_empty() {
        return Err(OrderError::Empty);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_lines_sums_duplicates_in_id_order() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();

        let merged = merge_lines([(b, 1), (a, 2), (b, 3)]).unwrap();

        assert_eq!(merged.into_iter().collect::<Vec<_>>(), vec![(a, 2), (b, 4)]);
    }

    #[test]
    fn test_merge_lines_rejects_empty_and_zero() {
        assert!(matches!(merge_lines([]), Err(OrderError::Empty)));

        let id = Uuid::now_v7();
        assert!(matches!(
            merge_lines([(id, 0)]),
            Err(OrderError::InvalidQuantity(bad)) if bad == id
        ));
    }

    #[test]
    fn test_status_transitions() {
        use OrderStatus::*;

        assert!(Pending.can_transition_to(Shipping));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Shipping.can_transition_to(Delivered));
        assert!(Shipping.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Shipping.can_transition_to(Shipping));
    }

    #[test]
    fn test_notification_carries_lines_and_contact() {
        let order_id = Uuid::now_v7();
        let order = Order {
            id: order_id,
            user_id: Uuid::now_v7(),
            status: OrderStatus::Pending,
            address: Some("Tashkent, Chilonzor 7".to_string()),
            comment: None,
            total_price: 30000,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            items: vec![OrderItem {
                id: Uuid::now_v7(),
                order_id,
                product_id: None,
                product_title: "Ibuprofen".to_string(),
                unit_price: 15000,
                quantity: 2,
            }],
        };
        let customer = Customer {
            name: "Malika".to_string(),
            surname: "Yusupova".to_string(),
            phone_number: "+998901112233".to_string(),
        };

        let notification = order.notification(&customer);

        assert_eq!(notification.order_id, order_id);
        assert_eq!(notification.client_surname, "Yusupova");
        assert_eq!(notification.status, "pending");
        assert_eq!(notification.lines[0].title, "Ibuprofen");
        assert_eq!(order.items[0].total_price(), 30000);
    }

    #[test]
    fn test_request_converts_to_new_order() {
        let id = Uuid::now_v7();
        let request: CreateOrderRequest = serde_json::from_value(serde_json::json!({
            "product_ids": [
                {"product_id": id, "quantity": 1},
                {"product_id": id, "quantity": 2}
            ],
            "address": "Samarkand"
        }))
        .unwrap();

        let order = NewOrder::try_from(request).unwrap();

        assert_eq!(order.lines.get(&id), Some(&3));
        assert!(order.comment.is_none());
    }
}
