//! Integration tests for order placement against a real Postgres.

use domain_notifications::NoopNotifier;
use domain_orders::*;
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};
use uuid::Uuid;

fn service(db: &TestDatabase) -> OrderService<PgOrderRepository> {
    OrderService::new(PgOrderRepository::new(db.connection()), Arc::new(NoopNotifier))
}

fn request(lines: &[(Uuid, i32)]) -> CreateOrderRequest {
    CreateOrderRequest {
        product_ids: lines
            .iter()
            .map(|&(product_id, quantity)| OrderLineRequest {
                product_id,
                quantity,
            })
            .collect(),
        address: "Tashkent, Yunusobod 4".to_string(),
        comment: Some("Call before delivery".to_string()),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_place_order_decrements_stock_and_snapshots_price() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("place_order");
    let user = db.create_user(&builder.email("buyer"), "user").await;
    let category = db.create_category(None).await;
    let aspirin = db.create_product(category, "Aspirin", 12000, 10).await;
    let zinc = db.create_product(category, "Zinc", 30000, 3).await;

    let order = service(&db)
        .place_order(user, request(&[(aspirin, 2), (zinc, 1), (aspirin, 1)]))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total_price, 3 * 12000 + 30000);
    assert_eq!(db.product_total(aspirin).await, 7);
    assert_eq!(db.product_total(zinc).await, 2);

    let stored = assert_some(
        service(&db).my_orders(user).await.unwrap().into_iter().next(),
        "placed order",
    );
    assert_uuid_eq(stored.id, order.id, "order id");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_insufficient_stock_rolls_back_every_line() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("insufficient_stock");
    let user = db.create_user(&builder.email("buyer"), "user").await;
    let category = db.create_category(None).await;
    let plenty = db.create_product(category, "Plenty", 1000, 50).await;
    let scarce = db.create_product(category, "Scarce", 1000, 1).await;

    let result = service(&db)
        .place_order(user, request(&[(plenty, 5), (scarce, 2)]))
        .await;

    assert!(matches!(result, Err(OrderError::InsufficientStock(title)) if title == "Scarce"));
    assert_eq!(db.product_total(plenty).await, 50);
    assert_eq!(db.product_total(scarce).await, 1);
    assert!(service(&db).my_orders(user).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_concurrent_orders_never_oversell() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("concurrent_orders");
    let first = db.create_user(&builder.email("first"), "user").await;
    let second = db.create_user(&builder.email("second"), "user").await;
    let category = db.create_category(None).await;
    let last_box = db.create_product(category, "Last box", 5000, 1).await;

    let a = service(&db);
    let b = service(&db);
    let (left, right) = tokio::join!(
        a.place_order(first, request(&[(last_box, 1)])),
        b.place_order(second, request(&[(last_box, 1)])),
    );

    assert_eq!([left.is_ok(), right.is_ok()].iter().filter(|ok| **ok).count(), 1);
    assert_eq!(db.product_total(last_box).await, 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_cancel_restores_stock() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("cancel_order");
    let user = db.create_user(&builder.email("buyer"), "user").await;
    let category = db.create_category(None).await;
    let product = db.create_product(category, "Omega 3", 80000, 4).await;
    let service = service(&db);

    let order = service
        .place_order(user, request(&[(product, 3)]))
        .await
        .unwrap();
    assert_eq!(db.product_total(product).await, 1);

    let shipping = service
        .update_status(order.id, OrderStatus::Shipping)
        .await
        .unwrap();
    assert_eq!(shipping.status, OrderStatus::Shipping);

    let cancelled = service
        .update_status(order.id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(db.product_total(product).await, 4);

    let reopen = service.update_status(order.id, OrderStatus::Pending).await;
    assert!(matches!(reopen, Err(OrderError::InvalidTransition { .. })));
}
