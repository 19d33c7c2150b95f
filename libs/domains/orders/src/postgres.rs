use async_trait::async_trait;
use database::BaseRepository;
use domain_catalog::entity::product;
use domain_users::entity::user;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    entity::{order, order_item},
    error::{OrderError, OrderResult},
    models::{Customer, NewOrder, Order, OrderItem, OrderStatus},
    repository::OrderRepository,
};

pub struct PgOrderRepository {
    base: BaseRepository<order::Entity>,
}

impl PgOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }
}

/// Locks each product row in ascending id order, decrements its stock and
/// writes the order with item snapshots. The caller owns commit and rollback.
pub async fn place_order_in_txn(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    new_order: &NewOrder,
) -> OrderResult<Order> {
    let mut snapshots = Vec::with_capacity(new_order.lines.len());
    let mut total_price: i64 = 0;

    for (&product_id, &quantity) in &new_order.lines {
        let product = product::Entity::find_by_id(product_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(OrderError::ProductNotFound(product_id))?;

        if product.total < quantity {
            return Err(OrderError::InsufficientStock(product.title));
        }

        let title = product.title.clone();
        let unit_price = product.price;
        let remaining = product.total - quantity;

        let mut active = product.into_active_model();
        active.total = Set(remaining);
        active.update(txn).await?;

        total_price += i64::from(unit_price) * i64::from(quantity);
        snapshots.push((product_id, title, unit_price, quantity));
    }

    let order = order::ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(user_id),
        status: Set(OrderStatus::Pending),
        address: Set(Some(new_order.address.clone())),
        comment: Set(new_order.comment.clone()),
        total_price: Set(total_price),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let mut items = Vec::with_capacity(snapshots.len());
    for (product_id, product_title, unit_price, quantity) in snapshots {
        let item = order_item::ActiveModel {
            id: Set(Uuid::now_v7()),
            order_id: Set(order.id),
            product_id: Set(Some(product_id)),
            product_title: Set(product_title),
            unit_price: Set(unit_price),
            quantity: Set(quantity),
        }
        .insert(txn)
        .await?;
        items.push(OrderItem::from(item));
    }

    tracing::info!(
        order_id = %order.id,
        user_id = %user_id,
        total_price,
        lines = items.len(),
        "Placed order"
    );
    Ok(order.into_order(items))
}

/// Name and phone of the account that placed an order.
pub async fn find_customer(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> OrderResult<Option<Customer>> {
    let model = user::Entity::find_by_id(user_id).one(db).await?;
    Ok(model.map(|u| Customer {
        name: u.name,
        surname: u.surname,
        phone_number: u.phone_number,
    }))
}

async fn items_by_order(
    db: &DatabaseConnection,
    order_ids: Vec<Uuid>,
) -> OrderResult<HashMap<Uuid, Vec<OrderItem>>> {
    let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    if order_ids.is_empty() {
        return Ok(grouped);
    }

    let items = order_item::Entity::find()
        .filter(order_item::Column::OrderId.is_in(order_ids))
        .order_by_asc(order_item::Column::ProductTitle)
        .all(db)
        .await?;
    for item in items {
        grouped.entry(item.order_id).or_default().push(item.into());
    }
    Ok(grouped)
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn place(&self, user_id: Uuid, new_order: NewOrder) -> OrderResult<Order> {
        let txn = self.db().begin().await?;
        let order = place_order_in_txn(&txn, user_id, &new_order).await?;
        txn.commit().await?;
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> OrderResult<Option<Order>> {
        let Some(model) = self.base.find_by_id(id).await? else {
            return Ok(None);
        };
        let mut items = items_by_order(self.db(), vec![id]).await?;
        Ok(Some(model.into_order(items.remove(&id).unwrap_or_default())))
    }

    async fn list_for_user(&self, user_id: Uuid) -> OrderResult<Vec<Order>> {
        let models = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(self.db())
            .await?;

        let mut items = items_by_order(self.db(), models.iter().map(|m| m.id).collect()).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let lines = items.remove(&m.id).unwrap_or_default();
                m.into_order(lines)
            })
            .collect())
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<Option<Order>> {
        let txn = self.db().begin().await?;

        let Some(current) = order::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        if !current.status.can_transition_to(status) {
            return Err(OrderError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(id))
            .order_by_asc(order_item::Column::ProductId)
            .all(&txn)
            .await?;

        if status == OrderStatus::Cancelled {
            for item in &items {
                // Deleted products have nothing to restore.
                let Some(product_id) = item.product_id else {
                    continue;
                };
                let Some(product) = product::Entity::find_by_id(product_id)
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                else {
                    continue;
                };
                let restored = product.total + item.quantity;
                let mut active = product.into_active_model();
                active.total = Set(restored);
                active.update(&txn).await?;
            }
        }

        let mut active = current.into_active_model();
        active.status = Set(status);
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(order_id = %id, status = %status, "Updated order status");

        let mut items: Vec<OrderItem> = items.into_iter().map(Into::into).collect();
        items.sort_by(|a, b| a.product_title.cmp(&b.product_title));
        Ok(Some(updated.into_order(items)))
    }

    async fn customer(&self, user_id: Uuid) -> OrderResult<Option<Customer>> {
        find_customer(self.db(), user_id).await
    }
}
