use domain_notifications::OrderNotifier;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{CreateOrderRequest, NewOrder, Order, OrderStatus};
use crate::repository::OrderRepository;

#[derive(Clone)]
pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
    notifier: Arc<dyn OrderNotifier>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repository: R, notifier: Arc<dyn OrderNotifier>) -> Self {
        Self {
            repository: Arc::new(repository),
            notifier,
        }
    }

    /// Places the order, then announces it to staff.
    pub async fn place_order(&self, user_id: Uuid, request: CreateOrderRequest) -> OrderResult<Order> {
        let new_order = NewOrder::try_from(request)?;
        let order = self.repository.place(user_id, new_order).await?;
        self.notify_placed(&order).await;
        Ok(order)
    }

    pub async fn my_orders(&self, user_id: Uuid) -> OrderResult<Vec<Order>> {
        self.repository.list_for_user(user_id).await
    }

    /// Specialists see every order; customers only their own.
    pub async fn get_order(&self, id: Uuid, viewer: Uuid, is_specialist: bool) -> OrderResult<Order> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|order| is_specialist || order.user_id == viewer)
            .ok_or(OrderError::NotFound(id))
    }

    pub async fn update_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<Order> {
        self.repository
            .update_status(id, status)
            .await?
            .ok_or(OrderError::NotFound(id))
    }

    async fn notify_placed(&self, order: &Order) {
        match self.repository.customer(order.user_id).await {
            Ok(Some(customer)) => self.notifier.order_placed(order.notification(&customer)).await,
            Ok(None) => tracing::warn!(order_id = %order.id, "Customer vanished before notification"),
            Err(e) => tracing::warn!(order_id = %order.id, error = %e, "Could not load customer for notification"),
        }
    }
}
