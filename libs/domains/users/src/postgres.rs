use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::BaseRepository;
use domain_catalog::{ProductSummary, entity::product};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{favorite, user},
    error::{UserError, UserResult},
    models::{NewUser, ProfileChanges, User, UserRole},
    repository::UserRepository,
};

pub struct PgUserRepository {
    base: BaseRepository<user::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }
}

fn map_unique_violation(err: DbErr, email: &str) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateEmail(email.to_string()),
        _ => UserError::Database(err),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: NewUser) -> UserResult<User> {
        let email = input.email.clone();
        let model = self
            .base
            .insert(user::ActiveModel::from(input))
            .await
            .map_err(|e| map_unique_violation(e, &email))?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.base.find_by_id(id).await?.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn set_otp(
        &self,
        id: Uuid,
        code: Option<String>,
        created_at: Option<DateTime<Utc>>,
    ) -> UserResult<()> {
        let Some(model) = self.base.find_by_id(id).await? else {
            return Err(UserError::NotFound(id));
        };
        let mut active = model.into_active_model();
        active.otp_code = Set(code);
        active.otp_created_at = Set(created_at.map(Into::into));
        self.base.update(active).await?;
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> UserResult<Option<User>> {
        let Some(model) = self.base.find_by_id(id).await? else {
            return Ok(None);
        };
        let email = changes.email.clone().unwrap_or_else(|| model.email.clone());

        let mut active = model.into_active_model();
        if let Some(value) = changes.email {
            active.email = Set(value);
        }
        if let Some(value) = changes.name {
            active.name = Set(value);
        }
        if let Some(value) = changes.surname {
            active.surname = Set(value);
        }
        if let Some(value) = changes.phone_number {
            active.phone_number = Set(value);
        }
        if let Some(value) = changes.avatar {
            active.avatar = Set(Some(value));
        }
        if let Some(value) = changes.password_hash {
            active.password_hash = Set(value);
        }

        let model = self
            .base
            .update(active)
            .await
            .map_err(|e| map_unique_violation(e, &email))?;
        Ok(Some(model.into()))
    }

    async fn list_by_role(&self, role: UserRole) -> UserResult<Vec<User>> {
        let models = user::Entity::find()
            .filter(user::Column::Role.eq(role))
            .order_by_asc(user::Column::Surname)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn product_exists(&self, product_id: Uuid) -> UserResult<bool> {
        Ok(product::Entity::find_by_id(product_id)
            .one(self.db())
            .await?
            .is_some())
    }

    async fn toggle_favorite(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool> {
        let txn = self.db().begin().await?;

        let existing = favorite::Entity::find_by_id((user_id, product_id))
            .one(&txn)
            .await?;
        let added = match existing {
            Some(link) => {
                link.delete(&txn).await?;
                false
            }
            None => {
                favorite::Entity::insert(favorite::ActiveModel {
                    user_id: Set(user_id),
                    product_id: Set(product_id),
                    ..Default::default()
                })
                .exec_without_returning(&txn)
                .await?;
                true
            }
        };

        txn.commit().await?;
        Ok(added)
    }

    async fn favorite_products(&self, user_id: Uuid) -> UserResult<Vec<ProductSummary>> {
        let product_ids: Vec<Uuid> = favorite::Entity::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by_desc(favorite::Column::CreatedAt)
            .all(self.db())
            .await?
            .into_iter()
            .map(|f| f.product_id)
            .collect();
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut products = product::Entity::find()
            .filter(product::Column::Id.is_in(product_ids.clone()))
            .all(self.db())
            .await?;
        products.sort_by_key(|p| product_ids.iter().position(|id| *id == p.id));

        Ok(products.into_iter().map(ProductSummary::from).collect())
    }
}
