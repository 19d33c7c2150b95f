use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Alias, Expr, ExprTrait, Query, SelectStatement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

use crate::{
    entity::{category, comment, faq, product, product_tag, tag},
    error::{CatalogError, CatalogResult},
    models::{
        Category, CategoryInput, Comment, CommentInput, Faq, FaqInput, Product, ProductInput,
        ProductQuery, Tag, TagInput,
    },
    repository::CatalogRepository,
};

/// `%term%` with LIKE wildcards in the term escaped.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Case-insensitive match over titles, descriptions, instructions and the
/// illness and composition lists in every language.
fn search_condition(term: &str) -> Condition {
    let pattern = contains_pattern(term);
    let text_columns = [
        product::Column::Title,
        product::Column::DescriptionUz,
        product::Column::DescriptionRu,
        product::Column::DescriptionEn,
        product::Column::InstructionUz,
        product::Column::InstructionRu,
        product::Column::InstructionEn,
    ];
    let list_columns = [
        product::Column::IllnessUz,
        product::Column::IllnessRu,
        product::Column::IllnessEn,
        product::Column::CompositionUz,
        product::Column::CompositionRu,
        product::Column::CompositionEn,
    ];

    let mut condition = Condition::any();
    for column in text_columns {
        condition = condition.add(Expr::col((product::Entity, column)).ilike(pattern.clone()));
    }
    for column in list_columns {
        condition = condition.add(
            Expr::col((product::Entity, column))
                .cast_as(Alias::new("text"))
                .ilike(pattern.clone()),
        );
    }
    condition
}

/// `SELECT 1 FROM product_tags` correlated with the outer product row.
fn product_tag_link() -> SelectStatement {
    Query::select()
        .expr(Expr::val(1))
        .from(product_tag::Entity)
        .and_where(
            Expr::col((product_tag::Entity, product_tag::Column::ProductId))
                .equals((product::Entity, product::Column::Id)),
        )
        .to_owned()
}

fn has_tag(tag_id: Uuid) -> Expr {
    Expr::exists(
        product_tag_link()
            .and_where(Expr::col((product_tag::Entity, product_tag::Column::TagId)).eq(tag_id))
            .to_owned(),
    )
}

fn has_tag_named(name: &str) -> Expr {
    let pattern = contains_pattern(name);
    let names = Condition::any()
        .add(Expr::col((tag::Entity, tag::Column::NameUz)).ilike(pattern.clone()))
        .add(Expr::col((tag::Entity, tag::Column::NameRu)).ilike(pattern.clone()))
        .add(Expr::col((tag::Entity, tag::Column::NameEn)).ilike(pattern));

    Expr::exists(
        product_tag_link()
            .inner_join(
                tag::Entity,
                Expr::col((tag::Entity, tag::Column::Id))
                    .equals((product_tag::Entity, product_tag::Column::TagId)),
            )
            .cond_where(names)
            .to_owned(),
    )
}

/// Products whose mean comment rating reaches `min`. Unrated products never match.
fn rated_at_least(min: f64) -> Expr {
    product::Column::Id.in_subquery(
        Query::select()
            .column(comment::Column::ProductId)
            .from(comment::Entity)
            .group_by_col(comment::Column::ProductId)
            .and_having(Expr::col(comment::Column::Rating).avg().gte(min))
            .to_owned(),
    )
}

pub struct PgCatalogRepository {
    categories: BaseRepository<category::Entity>,
    tags: BaseRepository<tag::Entity>,
    products: BaseRepository<product::Entity>,
    comments: BaseRepository<comment::Entity>,
    faqs: BaseRepository<faq::Entity>,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            categories: BaseRepository::new(db.clone()),
            tags: BaseRepository::new(db.clone()),
            products: BaseRepository::new(db.clone()),
            comments: BaseRepository::new(db.clone()),
            faqs: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.products.db()
    }

    /// Loads tags and average ratings for a page of products.
    async fn hydrate(&self, models: Vec<product::Model>) -> CatalogResult<Vec<Product>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

        let links = product_tag::Entity::find()
            .filter(product_tag::Column::ProductId.is_in(ids.clone()))
            .all(self.db())
            .await?;
        let tag_ids: BTreeSet<Uuid> = links.iter().map(|l| l.tag_id).collect();
        let tags: HashMap<Uuid, Tag> = tag::Entity::find()
            .filter(tag::Column::Id.is_in(tag_ids))
            .all(self.db())
            .await?
            .into_iter()
            .map(|t| (t.id, t.into()))
            .collect();

        let ratings: HashMap<Uuid, f64> = comment::Entity::find()
            .select_only()
            .column(comment::Column::ProductId)
            .column_as(comment::Column::Rating.avg(), "average_rating")
            .filter(comment::Column::ProductId.is_in(ids))
            .group_by(comment::Column::ProductId)
            .into_tuple::<(Uuid, Option<f64>)>()
            .all(self.db())
            .await?
            .into_iter()
            .filter_map(|(id, avg)| avg.map(|avg| (id, avg)))
            .collect();

        let mut tags_by_product: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for link in links {
            if let Some(tag) = tags.get(&link.tag_id) {
                tags_by_product
                    .entry(link.product_id)
                    .or_default()
                    .push(tag.clone());
            }
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let mut product_tags = tags_by_product.remove(&model.id).unwrap_or_default();
                product_tags.sort_by(|a, b| a.name_en.cmp(&b.name_en));
                let rating = ratings.get(&model.id).copied();
                model.into_product(product_tags, rating)
            })
            .collect())
    }

    async fn replace_tags<C: ConnectionTrait>(
        conn: &C,
        product_id: Uuid,
        tag_ids: &BTreeSet<Uuid>,
    ) -> CatalogResult<()> {
        product_tag::Entity::delete_many()
            .filter(product_tag::Column::ProductId.eq(product_id))
            .exec(conn)
            .await?;

        for tag_id in tag_ids {
            product_tag::ActiveModel {
                product_id: Set(product_id),
                tag_id: Set(*tag_id),
            }
            .insert(conn)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::NameEn)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_category(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        Ok(self.categories.find_by_id(id).await?.map(Into::into))
    }

    async fn create_category(&self, input: CategoryInput) -> CatalogResult<Category> {
        let model = self
            .categories
            .insert(category::ActiveModel::from(input))
            .await?;
        tracing::info!(category_id = %model.id, "Created category");
        Ok(model.into())
    }

    async fn update_category(
        &self,
        id: Uuid,
        input: CategoryInput,
    ) -> CatalogResult<Option<Category>> {
        let Some(model) = self.categories.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        active.parent_id = Set(input.parent_id);
        active.name_uz = Set(input.name_uz);
        active.name_ru = Set(input.name_ru);
        active.name_en = Set(input.name_en);
        active.image = Set(input.image);

        let updated = self.categories.update(active).await?;
        tracing::info!(category_id = %id, "Updated category");
        Ok(Some(updated.into()))
    }

    async fn delete_category(&self, id: Uuid) -> CatalogResult<bool> {
        let deleted = self.categories.delete_by_id(id).await?;
        if deleted {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(deleted)
    }

    async fn list_tags(&self) -> CatalogResult<Vec<Tag>> {
        let models = tag::Entity::find()
            .order_by_asc(tag::Column::NameEn)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_tag(&self, id: Uuid) -> CatalogResult<Option<Tag>> {
        Ok(self.tags.find_by_id(id).await?.map(Into::into))
    }

    async fn create_tag(&self, input: TagInput) -> CatalogResult<Tag> {
        let model = self.tags.insert(tag::ActiveModel::from(input)).await?;
        tracing::info!(tag_id = %model.id, "Created tag");
        Ok(model.into())
    }

    async fn update_tag(&self, id: Uuid, input: TagInput) -> CatalogResult<Option<Tag>> {
        let Some(model) = self.tags.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        active.name_uz = Set(input.name_uz);
        active.name_ru = Set(input.name_ru);
        active.name_en = Set(input.name_en);

        Ok(Some(self.tags.update(active).await?.into()))
    }

    async fn delete_tag(&self, id: Uuid) -> CatalogResult<bool> {
        Ok(self.tags.delete_by_id(id).await?)
    }

    async fn existing_tag_ids(&self, ids: Vec<Uuid>) -> CatalogResult<Vec<Uuid>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = tag::Entity::find()
            .select_only()
            .column(tag::Column::Id)
            .filter(tag::Column::Id.is_in(ids))
            .into_tuple::<Uuid>()
            .all(self.db())
            .await?;
        Ok(found)
    }

    async fn list_products(&self, query: ProductQuery) -> CatalogResult<Vec<Product>> {
        let mut select = product::Entity::find();

        if let Some(category_id) = query.category_id {
            select = select.filter(product::Column::CategoryId.eq(category_id));
        }
        match query.has_old_price {
            Some(true) => select = select.filter(product::Column::OldPrice.is_not_null()),
            Some(false) => select = select.filter(product::Column::OldPrice.is_null()),
            None => {}
        }
        if let Some(new) = query.new {
            select = select.filter(product::Column::New.eq(new));
        }
        if let Some(price_min) = query.price_min {
            select = select.filter(product::Column::Price.gte(price_min));
        }
        if let Some(price_max) = query.price_max {
            select = select.filter(product::Column::Price.lte(price_max));
        }
        if let Some(age_range) = query.age_range {
            select = select.filter(product::Column::AgeRange.eq(age_range));
        }
        if let Some(term) = &query.search {
            select = select.filter(search_condition(term));
        }
        for tag_id in &query.tag_ids {
            select = select.filter(has_tag(*tag_id));
        }
        if let Some(name) = &query.tag_name {
            select = select.filter(has_tag_named(name));
        }
        if let Some(min) = query.min_rating {
            select = select.filter(rated_at_least(min));
        }

        let models = select
            .order_by_desc(product::Column::CreatedAt)
            .order_by_asc(product::Column::Id)
            .limit(query.limit)
            .offset(query.offset)
            .all(self.db())
            .await?;

        self.hydrate(models).await
    }

    async fn get_product(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let Some(model) = self.products.find_by_id(id).await? else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![model]).await?.pop())
    }

    async fn create_product(&self, input: ProductInput) -> CatalogResult<Product> {
        let tag_ids: BTreeSet<Uuid> = input.tags.iter().copied().collect();

        let txn = self.db().begin().await?;
        let model = product::ActiveModel::from(input).insert(&txn).await?;
        Self::replace_tags(&txn, model.id, &tag_ids).await?;
        txn.commit().await?;

        tracing::info!(product_id = %model.id, "Created product");
        self.get_product(model.id)
            .await?
            .ok_or(CatalogError::ProductNotFound(model.id))
    }

    async fn update_product(
        &self,
        id: Uuid,
        input: ProductInput,
    ) -> CatalogResult<Option<Product>> {
        let tag_ids: BTreeSet<Uuid> = input.tags.iter().copied().collect();

        let txn = self.db().begin().await?;
        let Some(model) = product::Entity::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        active.apply_input(input);
        active.update(&txn).await?;
        Self::replace_tags(&txn, id, &tag_ids).await?;
        txn.commit().await?;

        tracing::info!(product_id = %id, "Updated product");
        self.get_product(id).await
    }

    async fn delete_product(&self, id: Uuid) -> CatalogResult<bool> {
        let deleted = self.products.delete_by_id(id).await?;
        if deleted {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(deleted)
    }

    async fn list_comments(&self, product_id: Uuid) -> CatalogResult<Vec<Comment>> {
        let models = comment::Entity::find()
            .filter(comment::Column::ProductId.eq(product_id))
            .order_by_desc(comment::Column::CreatedAt)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_comment(&self, product_id: Uuid, id: Uuid) -> CatalogResult<Option<Comment>> {
        let model = comment::Entity::find_by_id(id)
            .filter(comment::Column::ProductId.eq(product_id))
            .one(self.db())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn create_comment(
        &self,
        product_id: Uuid,
        user_id: Uuid,
        input: CommentInput,
    ) -> CatalogResult<Comment> {
        let model = self
            .comments
            .insert(comment::ActiveModel {
                id: Set(Uuid::now_v7()),
                product_id: Set(product_id),
                user_id: Set(Some(user_id)),
                text: Set(input.text),
                rating: Set(input.rating),
                created_at: Set(chrono::Utc::now().into()),
            })
            .await?;
        tracing::info!(comment_id = %model.id, product_id = %product_id, "Created comment");
        Ok(model.into())
    }

    async fn update_comment(&self, id: Uuid, input: CommentInput) -> CatalogResult<Comment> {
        let model = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::CommentNotFound(id))?;

        let mut active = model.into_active_model();
        active.text = Set(input.text);
        active.rating = Set(input.rating);
        Ok(self.comments.update(active).await?.into())
    }

    async fn delete_comment(&self, id: Uuid) -> CatalogResult<bool> {
        Ok(self.comments.delete_by_id(id).await?)
    }

    async fn list_faqs(&self) -> CatalogResult<Vec<Faq>> {
        let models = faq::Entity::find()
            .order_by_asc(faq::Column::CreatedAt)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_faq(&self, id: Uuid) -> CatalogResult<Option<Faq>> {
        Ok(self.faqs.find_by_id(id).await?.map(Into::into))
    }

    async fn create_faq(&self, input: FaqInput) -> CatalogResult<Faq> {
        Ok(self.faqs.insert(faq::ActiveModel::from(input)).await?.into())
    }

    async fn update_faq(&self, id: Uuid, input: FaqInput) -> CatalogResult<Option<Faq>> {
        let Some(model) = self.faqs.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        active.question_uz = Set(input.question_uz);
        active.question_ru = Set(input.question_ru);
        active.question_en = Set(input.question_en);
        active.answer_uz = Set(input.answer_uz);
        active.answer_ru = Set(input.answer_ru);
        active.answer_en = Set(input.answer_en);

        Ok(Some(self.faqs.update(active).await?.into()))
    }

    async fn delete_faq(&self, id: Uuid) -> CatalogResult<bool> {
        Ok(self.faqs.delete_by_id(id).await?)
    }
}
