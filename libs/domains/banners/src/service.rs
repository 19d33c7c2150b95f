use std::sync::Arc;
use uuid::Uuid;

use crate::error::{BannerError, BannerResult};
use crate::models::{Banner, CreateBanner, UpdateBanner};
use crate::repository::BannerRepository;

#[derive(Clone)]
pub struct BannerService<R: BannerRepository> {
    repository: Arc<R>,
}

impl<R: BannerRepository> BannerService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list_banners(&self) -> BannerResult<Vec<Banner>> {
        self.repository.list().await
    }

    pub async fn get_banner(&self, id: Uuid) -> BannerResult<Banner> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(BannerError::NotFound(id))
    }

    pub async fn create_banner(&self, input: CreateBanner) -> BannerResult<Banner> {
        self.repository.create(input).await
    }

    pub async fn update_banner(&self, id: Uuid, input: UpdateBanner) -> BannerResult<Banner> {
        self.repository
            .update(id, input)
            .await?
            .ok_or(BannerError::NotFound(id))
    }

    pub async fn delete_banner(&self, id: Uuid) -> BannerResult<()> {
        if !self.repository.delete(id).await? {
            return Err(BannerError::NotFound(id));
        }
        Ok(())
    }
}
