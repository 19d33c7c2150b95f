use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use uuid::Uuid;

use crate::{
    entity,
    error::BannerResult,
    models::{Banner, CreateBanner, UpdateBanner},
    repository::BannerRepository,
};

pub struct PgBannerRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgBannerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl BannerRepository for PgBannerRepository {
    async fn list(&self) -> BannerResult<Vec<Banner>> {
        let models = entity::Entity::find()
            .order_by_desc(entity::Column::CreatedAt)
            .all(self.base.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> BannerResult<Option<Banner>> {
        Ok(self.base.find_by_id(id).await?.map(Into::into))
    }

    async fn create(&self, input: CreateBanner) -> BannerResult<Banner> {
        let model = self.base.insert(entity::ActiveModel::from(input)).await?;
        tracing::info!(banner_id = %model.id, "Created banner");
        Ok(model.into())
    }

    async fn update(&self, id: Uuid, input: UpdateBanner) -> BannerResult<Option<Banner>> {
        let Some(model) = self.base.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut banner: Banner = model.into();
        banner.apply_update(input);

        let updated = self.base.update(entity::ActiveModel::from(banner)).await?;
        tracing::info!(banner_id = %id, "Updated banner");
        Ok(Some(updated.into()))
    }

    async fn delete(&self, id: Uuid) -> BannerResult<bool> {
        let deleted = self.base.delete_by_id(id).await?;
        if deleted {
            tracing::info!(banner_id = %id, "Deleted banner");
        }
        Ok(deleted)
    }
}
