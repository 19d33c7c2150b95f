use domain_notifications::OrderNotifier;
use domain_orders::Order;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{CartError, CartResult};
use crate::models::{AddToCart, CartView, CheckoutRequest};
use crate::repository::CartRepository;

#[derive(Clone)]
pub struct CartService<R: CartRepository> {
    repository: Arc<R>,
    notifier: Arc<dyn OrderNotifier>,
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repository: R, notifier: Arc<dyn OrderNotifier>) -> Self {
        Self {
            repository: Arc::new(repository),
            notifier,
        }
    }

    pub async fn view(&self, user_id: Uuid) -> CartResult<CartView> {
        let cart = self.repository.get_or_create(user_id).await?;
        self.view_of(cart.id).await
    }

    /// Adds to an existing line when the product is already in the cart.
    /// A line created concurrently by another request is summed into.
    pub async fn add(&self, user_id: Uuid, input: AddToCart) -> CartResult<CartView> {
        let product = self
            .repository
            .product(input.product_id)
            .await?
            .ok_or(CartError::ProductNotFound(input.product_id))?;
        let cart = self.repository.get_or_create(user_id).await?;

        for _ in 0..ADD_ATTEMPTS {
            match self
                .repository
                .find_item_by_product(cart.id, product.id)
                .await?
            {
                Some(item) => {
                    let quantity = item.quantity.saturating_add(input.quantity);
                    ensure_stock(quantity, product.total)?;
                    self.repository.set_quantity(item.id, quantity).await?;
                    return self.view_of(cart.id).await;
                }
                None => {
                    ensure_stock(input.quantity, product.total)?;
                    let inserted = self
                        .repository
                        .insert_item(cart.id, product.id, input.quantity)
                        .await?;
                    if inserted.is_some() {
                        return self.view_of(cart.id).await;
                    }
                    tracing::debug!(cart_id = %cart.id, product_id = %product.id, "Cart line created concurrently, summing instead");
                }
            }
        }

        Err(CartError::Contended)
    }

    pub async fn update_item(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> CartResult<CartView> {
        let cart = self.repository.get_or_create(user_id).await?;
        let item = self
            .repository
            .find_item(cart.id, item_id)
            .await?
            .ok_or(CartError::ItemNotFound(item_id))?;
        let product = self
            .repository
            .product(item.product_id)
            .await?
            .ok_or(CartError::ProductNotFound(item.product_id))?;

        ensure_stock(quantity, product.total)?;
        self.repository.set_quantity(item.id, quantity).await?;
        self.view_of(cart.id).await
    }

    pub async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> CartResult<()> {
        let cart = self.repository.get_or_create(user_id).await?;
        if self.repository.find_item(cart.id, item_id).await?.is_none() {
            return Err(CartError::ItemNotFound(item_id));
        }
        self.repository.delete_item(item_id).await?;
        Ok(())
    }

    /// Turns the cart into an order and announces it once committed.
    pub async fn checkout(&self, user_id: Uuid, request: CheckoutRequest) -> CartResult<Order> {
        let cart = self.repository.get_or_create(user_id).await?;
        let order = self.repository.checkout(user_id, cart.id, request).await?;

        match self.repository.customer(user_id).await {
            Ok(Some(customer)) => {
                self.notifier
                    .order_placed(order.notification(&customer))
                    .await
            }
            Ok(None) => tracing::warn!(order_id = %order.id, "Customer vanished before notification"),
            Err(e) => tracing::warn!(order_id = %order.id, error = %e, "Could not load customer for notification"),
        }

        Ok(order)
    }

    async fn view_of(&self, cart_id: Uuid) -> CartResult<CartView> {
        let lines = self.repository.lines(cart_id).await?;
        Ok(CartView::new(cart_id, lines))
    }
}

const ADD_ATTEMPTS: usize = 3;

fn ensure_stock(quantity: i32, available: i32) -> CartResult<()> {
    if quantity > available {
        return Err(CartError::NotEnoughStock);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Cart, CartItem};
    use crate::repository::MockCartRepository;
    use async_trait::async_trait;
    use chrono::Utc;
    use domain_catalog::{AgeRange, ProductSummary};
    use domain_notifications::OrderNotification;
    use domain_orders::{Customer, OrderError, OrderStatus};
    use mockall::predicate::eq;
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub(crate) sent: Mutex<Vec<OrderNotification>>,
    }

    #[async_trait]
    impl OrderNotifier for RecordingNotifier {
        async fn order_placed(&self, order: OrderNotification) {
            self.sent.lock().unwrap().push(order);
        }
    }

    pub(crate) fn cart_for(user_id: Uuid) -> Cart {
        Cart {
            id: Uuid::now_v7(),
            user_id,
            created_at: Utc::now(),
        }
    }

    fn product(total: i32) -> ProductSummary {
        ProductSummary {
            id: Uuid::now_v7(),
            title: "Magnesium B6".to_string(),
            price: 20000,
            old_price: None,
            total,
            new: Some(true),
            age_range: AgeRange::default(),
            category_id: Uuid::now_v7(),
        }
    }

    fn service(mock_repo: MockCartRepository) -> CartService<MockCartRepository> {
        CartService::new(mock_repo, Arc::new(RecordingNotifier::default()))
    }

    #[tokio::test]
    async fn test_add_sums_existing_quantity() {
        let user_id = Uuid::now_v7();
        let cart = cart_for(user_id);
        let cart_id = cart.id;
        let product = product(5);
        let product_id = product.id;
        let item_id = Uuid::now_v7();

        let mut mock_repo = MockCartRepository::new();
        mock_repo
            .expect_product()
            .returning(move |_| Ok(Some(product.clone())));
        mock_repo
            .expect_get_or_create()
            .returning(move |_| Ok(cart.clone()));
        mock_repo.expect_find_item_by_product().returning(move |_, _| {
            Ok(Some(CartItem {
                id: item_id,
                cart_id,
                product_id,
                quantity: 2,
            }))
        });
        mock_repo
            .expect_set_quantity()
            .with(eq(item_id), eq(5))
            .times(1)
            .returning(|_, _| Ok(()));
        mock_repo.expect_insert_item().never();
        mock_repo.expect_lines().returning(|_| Ok(vec![]));

        let view = service(mock_repo)
            .add(
                user_id,
                AddToCart {
                    product_id,
                    quantity: 3,
                },
            )
            .await
            .unwrap();

        assert_eq!(view.id, cart_id);
    }

    #[tokio::test]
    async fn test_add_sums_into_line_inserted_concurrently() {
        let user_id = Uuid::now_v7();
        let cart = cart_for(user_id);
        let cart_id = cart.id;
        let product = product(10);
        let product_id = product.id;
        let item_id = Uuid::now_v7();

        let mut mock_repo = MockCartRepository::new();
        mock_repo
            .expect_product()
            .returning(move |_| Ok(Some(product.clone())));
        mock_repo
            .expect_get_or_create()
            .returning(move |_| Ok(cart.clone()));

        let mut seq = mockall::Sequence::new();
        mock_repo
            .expect_find_item_by_product()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        mock_repo
            .expect_insert_item()
            .with(eq(cart_id), eq(product_id), eq(3))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(None));
        mock_repo
            .expect_find_item_by_product()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _| {
                Ok(Some(CartItem {
                    id: item_id,
                    cart_id,
                    product_id,
                    quantity: 4,
                }))
            });
        mock_repo
            .expect_set_quantity()
            .with(eq(item_id), eq(7))
            .times(1)
            .returning(|_, _| Ok(()));
        mock_repo.expect_lines().returning(|_| Ok(vec![]));

        let view = service(mock_repo)
            .add(
                user_id,
                AddToCart {
                    product_id,
                    quantity: 3,
                },
            )
            .await
            .unwrap();

        assert_eq!(view.id, cart_id);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_is_rejected() {
        let user_id = Uuid::now_v7();
        let cart = cart_for(user_id);
        let product = product(1);
        let product_id = product.id;

        let mut mock_repo = MockCartRepository::new();
        mock_repo
            .expect_product()
            .returning(move |_| Ok(Some(product.clone())));
        mock_repo
            .expect_get_or_create()
            .returning(move |_| Ok(cart.clone()));
        mock_repo
            .expect_find_item_by_product()
            .returning(|_, _| Ok(None));
        mock_repo.expect_insert_item().never();

        let result = service(mock_repo)
            .add(
                user_id,
                AddToCart {
                    product_id,
                    quantity: 2,
                },
            )
            .await;

        assert!(matches!(result, Err(CartError::NotEnoughStock)));
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let mut mock_repo = MockCartRepository::new();
        mock_repo.expect_product().returning(|_| Ok(None));
        mock_repo.expect_get_or_create().never();

        let result = service(mock_repo)
            .add(
                Uuid::now_v7(),
                AddToCart {
                    product_id: Uuid::now_v7(),
                    quantity: 1,
                },
            )
            .await;

        assert!(matches!(result, Err(CartError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_item_from_other_cart_is_not_found() {
        let user_id = Uuid::now_v7();
        let cart = cart_for(user_id);

        let mut mock_repo = MockCartRepository::new();
        mock_repo
            .expect_get_or_create()
            .returning(move |_| Ok(cart.clone()));
        mock_repo.expect_find_item().returning(|_, _| Ok(None));
        mock_repo.expect_delete_item().never();

        let result = service(mock_repo)
            .remove_item(user_id, Uuid::now_v7())
            .await;

        assert!(matches!(result, Err(CartError::ItemNotFound(_))));
    }

    #[tokio::test]
    async fn test_checkout_notifies_after_success() {
        let user_id = Uuid::now_v7();
        let cart = cart_for(user_id);

        let mut mock_repo = MockCartRepository::new();
        mock_repo
            .expect_get_or_create()
            .returning(move |_| Ok(cart.clone()));
        mock_repo.expect_checkout().returning(|uid, _, request| {
            Ok(Order {
                id: Uuid::now_v7(),
                user_id: uid,
                status: OrderStatus::Pending,
                address: Some(request.address),
                comment: request.comment,
                total_price: 0,
                created_at: Utc::now(),
                updated_at: Utc::now(),
                items: vec![],
            })
        });
        mock_repo.expect_customer().returning(|_| {
            Ok(Some(Customer {
                name: "Gulnora".to_string(),
                surname: "Tursunova".to_string(),
                phone_number: "+998911234567".to_string(),
            }))
        });
        let notifier = Arc::new(RecordingNotifier::default());

        let order = CartService::new(mock_repo, notifier.clone())
            .checkout(
                user_id,
                CheckoutRequest {
                    address: "Fergana".to_string(),
                    comment: None,
                },
            )
            .await
            .unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].order_id, order.id);
        assert_eq!(sent[0].address.as_deref(), Some("Fergana"));
    }

    #[tokio::test]
    async fn test_failed_checkout_does_not_notify() {
        let user_id = Uuid::now_v7();
        let cart = cart_for(user_id);

        let mut mock_repo = MockCartRepository::new();
        mock_repo
            .expect_get_or_create()
            .returning(move |_| Ok(cart.clone()));
        mock_repo.expect_checkout().returning(|_, _, _| {
            Err(CartError::Order(OrderError::InsufficientStock(
                "Magnesium B6".to_string(),
            )))
        });
        mock_repo.expect_customer().never();
        let notifier = Arc::new(RecordingNotifier::default());

        let result = CartService::new(mock_repo, notifier.clone())
            .checkout(
                user_id,
                CheckoutRequest {
                    address: "Fergana".to_string(),
                    comment: None,
                },
            )
            .await;

        assert!(matches!(result, Err(CartError::Order(_))));
        assert!(notifier.sent.lock().unwrap().is_empty());
    }
}
