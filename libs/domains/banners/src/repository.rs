use async_trait::async_trait;
use uuid::Uuid;

use crate::error::BannerResult;
use crate::models::{Banner, CreateBanner, UpdateBanner};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BannerRepository: Send + Sync {
    /// Newest first.
    async fn list(&self) -> BannerResult<Vec<Banner>>;

    async fn get_by_id(&self, id: Uuid) -> BannerResult<Option<Banner>>;

    async fn create(&self, input: CreateBanner) -> BannerResult<Banner>;

    /// Returns `None` when no banner has that id.
    async fn update(&self, id: Uuid, input: UpdateBanner) -> BannerResult<Option<Banner>>;

    async fn delete(&self, id: Uuid) -> BannerResult<bool>;
}
