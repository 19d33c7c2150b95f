use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain_catalog::ProductSummary;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::{NewUser, ProfileChanges, User, UserRole};

/// Account storage plus the favorites join table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DuplicateEmail` when the email is taken.
    async fn create(&self, user: NewUser) -> UserResult<User>;

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// `email` is expected lowercased.
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Stores or clears the pending one-time code.
    async fn set_otp(
        &self,
        id: Uuid,
        code: Option<String>,
        created_at: Option<DateTime<Utc>>,
    ) -> UserResult<()>;

    /// Returns `None` when the account no longer exists.
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> UserResult<Option<User>>;

    async fn list_by_role(&self, role: UserRole) -> UserResult<Vec<User>>;

    async fn product_exists(&self, product_id: Uuid) -> UserResult<bool>;

    /// Adds the favorite when absent, removes it otherwise. Returns `true` when added.
    async fn toggle_favorite(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool>;

    async fn favorite_products(&self, user_id: Uuid) -> UserResult<Vec<ProductSummary>>;
}
