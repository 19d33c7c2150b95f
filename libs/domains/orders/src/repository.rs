use async_trait::async_trait;
use uuid::Uuid;

use crate::error::OrderResult;
use crate::models::{Customer, NewOrder, Order, OrderStatus};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Reserves stock and stores the order atomically.
    async fn place(&self, user_id: Uuid, order: NewOrder) -> OrderResult<Order>;

    async fn find_by_id(&self, id: Uuid) -> OrderResult<Option<Order>>;

    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid) -> OrderResult<Vec<Order>>;

    /// Applies a status transition; cancelling puts the stock back.
    async fn update_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<Option<Order>>;

    async fn customer(&self, user_id: Uuid) -> OrderResult<Option<Customer>>;
}
