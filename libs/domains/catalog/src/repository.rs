use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{
    Category, CategoryInput, Comment, CommentInput, Faq, FaqInput, Product, ProductInput,
    ProductQuery, Tag, TagInput,
};

/// Persistence for categories, tags, products, comments and FAQ entries.
///
/// Update and delete methods report a missing row as `None` / `false`;
/// the service turns that into the matching not-found error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // Categories
    async fn list_categories(&self) -> CatalogResult<Vec<Category>>;
    async fn get_category(&self, id: Uuid) -> CatalogResult<Option<Category>>;
    async fn create_category(&self, input: CategoryInput) -> CatalogResult<Category>;
    async fn update_category(&self, id: Uuid, input: CategoryInput)
    -> CatalogResult<Option<Category>>;
    /// Children and their products go with it.
    async fn delete_category(&self, id: Uuid) -> CatalogResult<bool>;

    // Tags
    async fn list_tags(&self) -> CatalogResult<Vec<Tag>>;
    async fn get_tag(&self, id: Uuid) -> CatalogResult<Option<Tag>>;
    async fn create_tag(&self, input: TagInput) -> CatalogResult<Tag>;
    async fn update_tag(&self, id: Uuid, input: TagInput) -> CatalogResult<Option<Tag>>;
    async fn delete_tag(&self, id: Uuid) -> CatalogResult<bool>;
    /// The subset of `ids` that exist.
    async fn existing_tag_ids(&self, ids: Vec<Uuid>) -> CatalogResult<Vec<Uuid>>;

    // Products
    /// One page of products matching every filter, newest first, with tags and rating loaded.
    async fn list_products(&self, query: ProductQuery) -> CatalogResult<Vec<Product>>;
    async fn get_product(&self, id: Uuid) -> CatalogResult<Option<Product>>;
    async fn create_product(&self, input: ProductInput) -> CatalogResult<Product>;
    async fn update_product(&self, id: Uuid, input: ProductInput)
    -> CatalogResult<Option<Product>>;
    async fn delete_product(&self, id: Uuid) -> CatalogResult<bool>;

    // Comments
    async fn list_comments(&self, product_id: Uuid) -> CatalogResult<Vec<Comment>>;
    async fn get_comment(&self, product_id: Uuid, id: Uuid) -> CatalogResult<Option<Comment>>;
    async fn create_comment(
        &self,
        product_id: Uuid,
        user_id: Uuid,
        input: CommentInput,
    ) -> CatalogResult<Comment>;
    async fn update_comment(&self, id: Uuid, input: CommentInput) -> CatalogResult<Comment>;
    async fn delete_comment(&self, id: Uuid) -> CatalogResult<bool>;

    // FAQ
    async fn list_faqs(&self) -> CatalogResult<Vec<Faq>>;
    async fn get_faq(&self, id: Uuid) -> CatalogResult<Option<Faq>>;
    async fn create_faq(&self, input: FaqInput) -> CatalogResult<Faq>;
    async fn update_faq(&self, id: Uuid, input: FaqInput) -> CatalogResult<Option<Faq>>;
    async fn delete_faq(&self, id: Uuid) -> CatalogResult<bool>;
}
