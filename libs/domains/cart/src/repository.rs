use async_trait::async_trait;
use domain_catalog::ProductSummary;
use domain_orders::{Customer, Order};
use uuid::Uuid;

use crate::error::CartResult;
use crate::models::{Cart, CartItem, CartLine, CheckoutRequest};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn get_or_create(&self, user_id: Uuid) -> CartResult<Cart>;

    /// Items with their products, oldest first.
    async fn lines(&self, cart_id: Uuid) -> CartResult<Vec<CartLine>>;

    async fn product(&self, product_id: Uuid) -> CartResult<Option<ProductSummary>>;

    async fn find_item(&self, cart_id: Uuid, item_id: Uuid) -> CartResult<Option<CartItem>>;

    async fn find_item_by_product(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
    ) -> CartResult<Option<CartItem>>;

    /// `None` when the cart already holds a line for the product.
    async fn insert_item(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> CartResult<Option<CartItem>>;

    async fn set_quantity(&self, item_id: Uuid, quantity: i32) -> CartResult<()>;

    async fn delete_item(&self, item_id: Uuid) -> CartResult<bool>;

    /// Places an order from the cart and empties it in one transaction.
    async fn checkout(
        &self,
        user_id: Uuid,
        cart_id: Uuid,
        request: CheckoutRequest,
    ) -> CartResult<Order>;

    async fn customer(&self, user_id: Uuid) -> CartResult<Option<Customer>>;
}
