use std::sync::Arc;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CategoryInput, CategoryTree, Comment, CommentInput, Faq, FaqInput, Product,
    ProductDetail, ProductFilter, ProductInput, ProductQuery, Tag, TagInput,
};
use crate::repository::CatalogRepository;

/// Business rules for the catalog: tree integrity, references between
/// products, categories and tags, and comment ownership.
#[derive(Clone)]
pub struct CatalogService<R: CatalogRepository> {
    repository: Arc<R>,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    /// Root categories, each with its subtree.
    pub async fn list_categories(&self) -> CatalogResult<Vec<CategoryTree>> {
        let all = self.repository.list_categories().await?;
        Ok(all
            .iter()
            .filter(|c| c.parent_id.is_none())
            .map(|root| CategoryTree::build(root, &all))
            .collect())
    }

    pub async fn get_category(&self, id: Uuid) -> CatalogResult<CategoryTree> {
        let all = self.repository.list_categories().await?;
        Self::subtree(id, &all)
    }

    fn subtree(id: Uuid, all: &[Category]) -> CatalogResult<CategoryTree> {
        all.iter()
            .find(|c| c.id == id)
            .map(|root| CategoryTree::build(root, all))
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    pub async fn create_category(&self, input: CategoryInput) -> CatalogResult<Category> {
        if let Some(parent_id) = input.parent_id {
            self.ensure_category(parent_id).await?;
        }
        self.repository.create_category(input).await
    }

    pub async fn update_category(&self, id: Uuid, input: CategoryInput) -> CatalogResult<Category> {
        let all = self.repository.list_categories().await?;
        let subtree = Self::subtree(id, &all)?;

        if let Some(parent_id) = input.parent_id {
            if subtree.ids().contains(&parent_id) {
                return Err(CatalogError::CategoryCycle);
            }
            if !all.iter().any(|c| c.id == parent_id) {
                return Err(CatalogError::CategoryNotFound(parent_id));
            }
        }

        self.repository
            .update_category(id, input)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    pub async fn delete_category(&self, id: Uuid) -> CatalogResult<()> {
        if !self.repository.delete_category(id).await? {
            return Err(CatalogError::CategoryNotFound(id));
        }
        Ok(())
    }

    async fn ensure_category(&self, id: Uuid) -> CatalogResult<Category> {
        self.repository
            .get_category(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    // ------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------

    pub async fn list_tags(&self) -> CatalogResult<Vec<Tag>> {
        self.repository.list_tags().await
    }

    pub async fn get_tag(&self, id: Uuid) -> CatalogResult<Tag> {
        self.repository
            .get_tag(id)
            .await?
            .ok_or(CatalogError::TagNotFound(id))
    }

    pub async fn create_tag(&self, input: TagInput) -> CatalogResult<Tag> {
        self.repository.create_tag(input).await
    }

    pub async fn update_tag(&self, id: Uuid, input: TagInput) -> CatalogResult<Tag> {
        self.repository
            .update_tag(id, input)
            .await?
            .ok_or(CatalogError::TagNotFound(id))
    }

    pub async fn delete_tag(&self, id: Uuid) -> CatalogResult<()> {
        if !self.repository.delete_tag(id).await? {
            return Err(CatalogError::TagNotFound(id));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    /// Filters and paging all run in SQL. A category narrows to products
    /// filed directly under it; an unknown category yields an empty page.
    pub async fn list_products(
        &self,
        filter: ProductFilter,
        category_id: Option<Uuid>,
    ) -> CatalogResult<Vec<Product>> {
        let mut query = ProductQuery::from_filter(&filter).map_err(|_| {
            CatalogError::Validation("tags must be a comma-separated list of UUIDs".to_string())
        })?;
        query.category_id = category_id;

        self.repository.list_products(query).await
    }

    pub async fn get_product(&self, id: Uuid) -> CatalogResult<ProductDetail> {
        let product = self.ensure_product(id).await?;
        let category = self.ensure_category(product.category_id).await?;
        let comments = self.repository.list_comments(id).await?;

        Ok(ProductDetail {
            product,
            category,
            comments,
        })
    }

    pub async fn create_product(&self, input: ProductInput) -> CatalogResult<Product> {
        self.check_product_references(&input).await?;
        self.repository.create_product(input).await
    }

    pub async fn update_product(&self, id: Uuid, input: ProductInput) -> CatalogResult<Product> {
        self.check_product_references(&input).await?;
        self.repository
            .update_product(id, input)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    pub async fn delete_product(&self, id: Uuid) -> CatalogResult<()> {
        if !self.repository.delete_product(id).await? {
            return Err(CatalogError::ProductNotFound(id));
        }
        Ok(())
    }

    async fn check_product_references(&self, input: &ProductInput) -> CatalogResult<()> {
        self.ensure_category(input.category_id).await?;

        if !input.tags.is_empty() {
            let existing = self.repository.existing_tag_ids(input.tags.clone()).await?;
            if let Some(missing) = input.tags.iter().find(|id| !existing.contains(id)) {
                return Err(CatalogError::TagNotFound(*missing));
            }
        }
        Ok(())
    }

    async fn ensure_product(&self, id: Uuid) -> CatalogResult<Product> {
        self.repository
            .get_product(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    pub async fn list_comments(&self, product_id: Uuid) -> CatalogResult<Vec<Comment>> {
        self.ensure_product(product_id).await?;
        self.repository.list_comments(product_id).await
    }

    pub async fn get_comment(&self, product_id: Uuid, id: Uuid) -> CatalogResult<Comment> {
        self.repository
            .get_comment(product_id, id)
            .await?
            .ok_or(CatalogError::CommentNotFound(id))
    }

    pub async fn create_comment(
        &self,
        product_id: Uuid,
        user_id: Uuid,
        input: CommentInput,
    ) -> CatalogResult<Comment> {
        check_rating(input.rating)?;
        self.ensure_product(product_id).await?;
        self.repository
            .create_comment(product_id, user_id, input)
            .await
    }

    pub async fn update_comment(
        &self,
        product_id: Uuid,
        id: Uuid,
        user_id: Uuid,
        input: CommentInput,
    ) -> CatalogResult<Comment> {
        check_rating(input.rating)?;
        self.authored_comment(product_id, id, user_id).await?;
        self.repository.update_comment(id, input).await
    }

    pub async fn delete_comment(&self, product_id: Uuid, id: Uuid, user_id: Uuid) -> CatalogResult<()> {
        self.authored_comment(product_id, id, user_id).await?;
        if !self.repository.delete_comment(id).await? {
            return Err(CatalogError::CommentNotFound(id));
        }
        Ok(())
    }

    async fn authored_comment(
        &self,
        product_id: Uuid,
        id: Uuid,
        user_id: Uuid,
    ) -> CatalogResult<Comment> {
        let comment = self.get_comment(product_id, id).await?;
        if comment.user_id != Some(user_id) {
            return Err(CatalogError::NotCommentAuthor(id));
        }
        Ok(comment)
    }

    // ------------------------------------------------------------------
    // FAQ
    // ------------------------------------------------------------------

    pub async fn list_faqs(&self) -> CatalogResult<Vec<Faq>> {
        self.repository.list_faqs().await
    }

    pub async fn get_faq(&self, id: Uuid) -> CatalogResult<Faq> {
        self.repository
            .get_faq(id)
            .await?
            .ok_or(CatalogError::FaqNotFound(id))
    }

    pub async fn create_faq(&self, input: FaqInput) -> CatalogResult<Faq> {
        self.repository.create_faq(input).await
    }

    pub async fn update_faq(&self, id: Uuid, input: FaqInput) -> CatalogResult<Faq> {
        self.repository
            .update_faq(id, input)
            .await?
            .ok_or(CatalogError::FaqNotFound(id))
    }

    pub async fn delete_faq(&self, id: Uuid) -> CatalogResult<()> {
        if !self.repository.delete_faq(id).await? {
            return Err(CatalogError::FaqNotFound(id));
        }
        Ok(())
    }
}

fn check_rating(rating: f64) -> CatalogResult<()> {
    if (1.0..=5.0).contains(&rating) {
        Ok(())
    } else {
        Err(CatalogError::Validation(
            "Rating must be between 1.0 and 5.0".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgeRange;
    use crate::repository::MockCatalogRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn category(id: Uuid, parent_id: Option<Uuid>) -> Category {
        Category {
            id,
            parent_id,
            name_uz: "Dori".to_string(),
            name_ru: "Лекарства".to_string(),
            name_en: format!("Medicine {id}"),
            image: None,
            created_at: Utc::now(),
        }
    }

    fn category_input(parent_id: Option<Uuid>) -> CategoryInput {
        CategoryInput {
            parent_id,
            name_uz: "Dori".to_string(),
            name_ru: "Лекарства".to_string(),
            name_en: "Medicine".to_string(),
            image: None,
        }
    }

    fn product(title: &str, category_id: Uuid) -> Product {
        Product {
            id: Uuid::now_v7(),
            title: title.to_string(),
            description_uz: String::new(),
            description_ru: String::new(),
            description_en: String::new(),
            instruction_uz: String::new(),
            instruction_ru: String::new(),
            instruction_en: String::new(),
            illness_uz: vec![],
            illness_ru: vec![],
            illness_en: vec![],
            composition_uz: vec![],
            composition_ru: vec![],
            composition_en: vec![],
            links: vec![],
            price: 10000,
            old_price: None,
            total: 5,
            new: None,
            age_range: AgeRange::Adults,
            category_id,
            tags: vec![],
            average_rating: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn product_input(category_id: Uuid, tags: Vec<Uuid>) -> ProductInput {
        serde_json::from_value(serde_json::json!({
            "title": "Aspirin",
            "price": 5000,
            "total": 3,
            "category_id": category_id,
            "tags": tags,
        }))
        .unwrap()
    }

    fn comment(product_id: Uuid, user_id: Option<Uuid>) -> Comment {
        Comment {
            id: Uuid::now_v7(),
            product_id,
            user_id,
            text: "Works".to_string(),
            rating: 4.0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_categories_returns_roots_with_children() {
        let root = Uuid::now_v7();
        let child = Uuid::now_v7();
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo
            .expect_list_categories()
            .returning(move || Ok(vec![category(root, None), category(child, Some(root))]));

        let service = CatalogService::new(mock_repo);
        let trees = service.list_categories().await.unwrap();

        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].id, root);
        assert_eq!(trees[0].children[0].id, child);
    }

    #[tokio::test]
    async fn test_create_category_with_unknown_parent_is_not_found() {
        let parent = Uuid::now_v7();
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo
            .expect_get_category()
            .with(eq(parent))
            .returning(|_| Ok(None));
        mock_repo.expect_create_category().never();

        let service = CatalogService::new(mock_repo);
        let result = service.create_category(category_input(Some(parent))).await;

        assert!(matches!(result, Err(CatalogError::CategoryNotFound(id)) if id == parent));
    }

    #[tokio::test]
    async fn test_update_category_rejects_descendant_as_parent() {
        let root = Uuid::now_v7();
        let child = Uuid::now_v7();
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo
            .expect_list_categories()
            .returning(move || Ok(vec![category(root, None), category(child, Some(root))]));
        mock_repo.expect_update_category().never();

        let service = CatalogService::new(mock_repo);

        let own_child = service.update_category(root, category_input(Some(child))).await;
        assert!(matches!(own_child, Err(CatalogError::CategoryCycle)));

        let itself = service.update_category(root, category_input(Some(root))).await;
        assert!(matches!(itself, Err(CatalogError::CategoryCycle)));
    }

    #[tokio::test]
    async fn test_list_products_by_category_filters_exact_category() {
        let root = Uuid::now_v7();
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo.expect_list_categories().never();
        mock_repo
            .expect_list_products()
            .withf(move |q| q.category_id == Some(root))
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = CatalogService::new(mock_repo);
        let products = service
            .list_products(ProductFilter::default(), Some(root))
            .await
            .unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_list_products_passes_search_rating_and_paging_to_repository() {
        let category_id = Uuid::now_v7();
        let tag = Uuid::now_v7();
        let rated = product("Ibuprofen", category_id);

        let mut mock_repo = MockCatalogRepository::new();
        mock_repo
            .expect_list_products()
            .withf(move |q| {
                q.search.as_deref() == Some("ibuprofen")
                    && q.tag_ids == vec![tag]
                    && q.tag_name.as_deref() == Some("kids")
                    && q.min_rating == Some(4.0)
                    && q.limit == 2
                    && q.offset == 1
                    && q.category_id.is_none()
            })
            .times(1)
            .returning(move |_| Ok(vec![rated.clone()]));

        let service = CatalogService::new(mock_repo);
        let filter = ProductFilter {
            search: Some(" ibuprofen ".to_string()),
            tags: Some(tag.to_string()),
            tag_name: Some("kids".to_string()),
            average_rating: Some(4.0),
            limit: Some(2),
            offset: Some(1),
            ..Default::default()
        };
        let found = service.list_products(filter, None).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Ibuprofen");
    }

    #[tokio::test]
    async fn test_list_products_rejects_malformed_tag_ids() {
        let mock_repo = MockCatalogRepository::new();
        let service = CatalogService::new(mock_repo);
        let filter = ProductFilter {
            tags: Some("not-a-uuid".to_string()),
            ..Default::default()
        };

        let result = service.list_products(filter, None).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_product_with_unknown_tag_is_not_found() {
        let category_id = Uuid::now_v7();
        let known = Uuid::now_v7();
        let unknown = Uuid::now_v7();
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo
            .expect_get_category()
            .returning(move |id| Ok(Some(category(id, None))));
        mock_repo
            .expect_existing_tag_ids()
            .returning(move |_| Ok(vec![known]));
        mock_repo.expect_create_product().never();

        let service = CatalogService::new(mock_repo);
        let result = service
            .create_product(product_input(category_id, vec![known, unknown]))
            .await;

        assert!(matches!(result, Err(CatalogError::TagNotFound(id)) if id == unknown));
    }

    #[tokio::test]
    async fn test_create_product_with_unknown_category_is_not_found() {
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo.expect_get_category().returning(|_| Ok(None));

        let service = CatalogService::new(mock_repo);
        let result = service
            .create_product(product_input(Uuid::now_v7(), vec![]))
            .await;

        assert!(matches!(result, Err(CatalogError::CategoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_comment_checks_rating_and_product() {
        let product_id = Uuid::now_v7();
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo.expect_get_product().returning(|_| Ok(None));
        mock_repo.expect_create_comment().never();

        let service = CatalogService::new(mock_repo);

        let out_of_range = CommentInput {
            text: "Too good".to_string(),
            rating: 6.0,
        };
        let result = service
            .create_comment(product_id, Uuid::now_v7(), out_of_range)
            .await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));

        let valid = CommentInput {
            text: "Fine".to_string(),
            rating: 3.5,
        };
        let result = service.create_comment(product_id, Uuid::now_v7(), valid).await;
        assert!(matches!(result, Err(CatalogError::ProductNotFound(id)) if id == product_id));
    }

    #[tokio::test]
    async fn test_only_author_can_delete_comment() {
        let product_id = Uuid::now_v7();
        let author = Uuid::now_v7();
        let existing = comment(product_id, Some(author));
        let comment_id = existing.id;

        let mut mock_repo = MockCatalogRepository::new();
        mock_repo
            .expect_get_comment()
            .returning(move |_, _| Ok(Some(existing.clone())));
        mock_repo
            .expect_delete_comment()
            .with(eq(comment_id))
            .times(1)
            .returning(|_| Ok(true));

        let service = CatalogService::new(mock_repo);

        let stranger = service
            .delete_comment(product_id, comment_id, Uuid::now_v7())
            .await;
        assert!(matches!(stranger, Err(CatalogError::NotCommentAuthor(_))));

        service
            .delete_comment(product_id, comment_id, author)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_orphaned_comment_cannot_be_edited() {
        let product_id = Uuid::now_v7();
        let orphan = comment(product_id, None);
        let comment_id = orphan.id;

        let mut mock_repo = MockCatalogRepository::new();
        mock_repo
            .expect_get_comment()
            .returning(move |_, _| Ok(Some(orphan.clone())));
        mock_repo.expect_update_comment().never();

        let service = CatalogService::new(mock_repo);
        let result = service
            .update_comment(
                product_id,
                comment_id,
                Uuid::now_v7(),
                CommentInput {
                    text: "edit".to_string(),
                    rating: 2.0,
                },
            )
            .await;
        assert!(matches!(result, Err(CatalogError::NotCommentAuthor(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_faq_is_not_found() {
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo.expect_delete_faq().returning(|_| Ok(false));

        let service = CatalogService::new(mock_repo);
        let id = Uuid::now_v7();
        let result = service.delete_faq(id).await;
        assert!(matches!(result, Err(CatalogError::FaqNotFound(missing)) if missing == id));
    }
}
