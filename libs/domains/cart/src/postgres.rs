use async_trait::async_trait;
use database::BaseRepository;
use domain_catalog::{ProductSummary, entity::product};
use domain_orders::{Customer, NewOrder, Order, find_customer, place_order_in_txn};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    entity::{cart, cart_item},
    error::{CartError, CartResult},
    models::{Cart, CartItem, CartLine, CheckoutRequest},
    repository::CartRepository,
};

pub struct PgCartRepository {
    base: BaseRepository<cart::Entity>,
}

impl PgCartRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }

    async fn find_by_user(&self, user_id: Uuid) -> CartResult<Option<cart::Model>> {
        Ok(cart::Entity::find()
            .filter(cart::Column::UserId.eq(user_id))
            .one(self.db())
            .await?)
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn get_or_create(&self, user_id: Uuid) -> CartResult<Cart> {
        if let Some(existing) = self.find_by_user(user_id).await? {
            return Ok(existing.into());
        }

        // Two first requests may race; the loser keeps the winner's cart.
        cart::Entity::insert(cart::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(cart::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.db())
        .await?;

        let created = self
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| CartError::Database(sea_orm::DbErr::RecordNotFound("cart".into())))?;
        tracing::debug!(cart_id = %created.id, user_id = %user_id, "Created cart");
        Ok(created.into())
    }

    async fn lines(&self, cart_id: Uuid) -> CartResult<Vec<CartLine>> {
        let items = cart_item::Entity::find()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .order_by_asc(cart_item::Column::CreatedAt)
            .all(self.db())
            .await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let products: HashMap<Uuid, product::Model> = product::Entity::find()
            .filter(product::Column::Id.is_in(items.iter().map(|i| i.product_id)))
            .all(self.db())
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(items
            .into_iter()
            .filter_map(|item| {
                let product = products.get(&item.product_id)?.clone();
                Some(CartLine::new(item.id, product.into(), item.quantity))
            })
            .collect())
    }

    async fn product(&self, product_id: Uuid) -> CartResult<Option<ProductSummary>> {
        Ok(product::Entity::find_by_id(product_id)
            .one(self.db())
            .await?
            .map(Into::into))
    }

    async fn find_item(&self, cart_id: Uuid, item_id: Uuid) -> CartResult<Option<CartItem>> {
        Ok(cart_item::Entity::find_by_id(item_id)
            .filter(cart_item::Column::CartId.eq(cart_id))
            .one(self.db())
            .await?
            .map(Into::into))
    }

    async fn find_item_by_product(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
    ) -> CartResult<Option<CartItem>> {
        Ok(cart_item::Entity::find()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .one(self.db())
            .await?
            .map(Into::into))
    }

    async fn insert_item(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> CartResult<Option<CartItem>> {
        let id = Uuid::now_v7();
        let inserted = cart_item::Entity::insert(cart_item::ActiveModel {
            id: Set(id),
            cart_id: Set(cart_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([cart_item::Column::CartId, cart_item::Column::ProductId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.db())
        .await?;
        if inserted == 0 {
            return Ok(None);
        }

        Ok(cart_item::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .map(Into::into))
    }

    async fn set_quantity(&self, item_id: Uuid, quantity: i32) -> CartResult<()> {
        let model = cart_item::Entity::find_by_id(item_id)
            .one(self.db())
            .await?
            .ok_or(CartError::ItemNotFound(item_id))?;
        let mut active = model.into_active_model();
        active.quantity = Set(quantity);
        active.update(self.db()).await?;
        Ok(())
    }

    async fn delete_item(&self, item_id: Uuid) -> CartResult<bool> {
        let result = cart_item::Entity::delete_by_id(item_id)
            .exec(self.db())
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn checkout(
        &self,
        user_id: Uuid,
        cart_id: Uuid,
        request: CheckoutRequest,
    ) -> CartResult<Order> {
        let txn = self.db().begin().await?;

        // Serializes checkouts of the same cart until commit.
        cart::Entity::find_by_id(cart_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| CartError::Database(sea_orm::DbErr::RecordNotFound("cart".into())))?;

        let items = cart_item::Entity::find()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .all(&txn)
            .await?;
        if items.is_empty() {
            return Err(CartError::Empty);
        }

        let new_order = NewOrder::new(
            items.iter().map(|item| (item.product_id, item.quantity)),
            request.address,
            request.comment,
        )?;
        let order = place_order_in_txn(&txn, user_id, &new_order).await?;

        cart_item::Entity::delete_many()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        tracing::info!(cart_id = %cart_id, order_id = %order.id, "Checked out cart");
        Ok(order)
    }

    async fn customer(&self, user_id: Uuid) -> CartResult<Option<Customer>> {
        Ok(find_customer(self.db(), user_id).await?)
    }
}
