use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 100;

fn validate_links(links: &[String]) -> Result<(), ValidationError> {
    let valid = links
        .iter()
        .all(|link| link.starts_with("http://") || link.starts_with("https://"));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_link").with_message("Links must be http(s) URLs".into()))
    }
}

/// Accepts `18+` even when the `+` arrived form-decoded as a space.
fn deserialize_age_range<'de, D>(deserializer: D) -> Result<Option<AgeRange>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| {
        let value = value.trim();
        let value = if value == "18" { "18+" } else { value };
        AgeRange::try_from(value).map_err(serde::de::Error::custom)
    })
    .transpose()
}

/// Age group a product is intended for
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "age_range")]
pub enum AgeRange {
    #[sea_orm(string_value = "0-2")]
    #[serde(rename = "0-2")]
    #[strum(serialize = "0-2")]
    Infants,
    #[sea_orm(string_value = "3-7")]
    #[serde(rename = "3-7")]
    #[strum(serialize = "3-7")]
    YoungChildren,
    #[sea_orm(string_value = "8-12")]
    #[serde(rename = "8-12")]
    #[strum(serialize = "8-12")]
    Children,
    #[sea_orm(string_value = "13-17")]
    #[serde(rename = "13-17")]
    #[strum(serialize = "13-17")]
    Teenagers,
    #[default]
    #[sea_orm(string_value = "18+")]
    #[serde(rename = "18+")]
    #[strum(serialize = "18+")]
    Adults,
}

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name_uz: String,
    pub name_ru: String,
    pub name_en: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A category with its whole subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryTree {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name_uz: String,
    pub name_ru: String,
    pub name_en: String,
    pub image: Option<String>,
    #[schema(no_recursion)]
    pub children: Vec<CategoryTree>,
}

impl CategoryTree {
    /// Builds the tree under `root` from a flat list of categories.
    pub fn build(root: &Category, all: &[Category]) -> Self {
        let mut children: Vec<CategoryTree> = all
            .iter()
            .filter(|c| c.parent_id == Some(root.id))
            .map(|child| CategoryTree::build(child, all))
            .collect();
        children.sort_by(|a, b| a.name_en.cmp(&b.name_en));

        Self {
            id: root.id,
            parent_id: root.parent_id,
            name_uz: root.name_uz.clone(),
            name_ru: root.name_ru.clone(),
            name_en: root.name_en.clone(),
            image: root.image.clone(),
            children,
        }
    }

    /// Ids of this category and every descendant.
    pub fn ids(&self) -> Vec<Uuid> {
        let mut ids = vec![self.id];
        for child in &self.children {
            ids.extend(child.ids());
        }
        ids
    }
}

/// Body for creating or replacing a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CategoryInput {
    pub parent_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub name_uz: String,
    #[validate(length(min = 1, max = 100))]
    pub name_ru: String,
    #[validate(length(min = 1, max = 100))]
    pub name_en: String,
    #[validate(url)]
    pub image: Option<String>,
}

// ============================================================================
// Tags
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Tag {
    pub id: Uuid,
    pub name_uz: String,
    pub name_ru: String,
    pub name_en: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct TagInput {
    #[validate(length(min = 1, max = 100))]
    pub name_uz: String,
    #[validate(length(min = 1, max = 100))]
    pub name_ru: String,
    #[validate(length(min = 1, max = 100))]
    pub name_en: String,
}

// ============================================================================
// Products
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description_uz: String,
    pub description_ru: String,
    pub description_en: String,
    pub instruction_uz: String,
    pub instruction_ru: String,
    pub instruction_en: String,
    pub illness_uz: Vec<String>,
    pub illness_ru: Vec<String>,
    pub illness_en: Vec<String>,
    pub composition_uz: Vec<String>,
    pub composition_ru: Vec<String>,
    pub composition_en: Vec<String>,
    pub links: Vec<String>,
    pub price: i32,
    pub old_price: Option<i32>,
    /// Units in stock
    pub total: i32,
    pub new: Option<bool>,
    pub age_range: AgeRange,
    pub category_id: Uuid,
    pub tags: Vec<Tag>,
    /// Mean comment rating, absent when nobody rated the product yet
    pub average_rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact product view used by carts, favorites and listings elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub title: String,
    pub price: i32,
    pub old_price: Option<i32>,
    pub total: i32,
    pub new: Option<bool>,
    pub age_range: AgeRange,
    pub category_id: Uuid,
}

/// A product with its category and comments.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
    pub comments: Vec<Comment>,
}

/// Body for creating or replacing a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[serde(default)]
    pub description_uz: String,
    #[serde(default)]
    pub description_ru: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub instruction_uz: String,
    #[serde(default)]
    pub instruction_ru: String,
    #[serde(default)]
    pub instruction_en: String,
    #[serde(default)]
    pub illness_uz: Vec<String>,
    #[serde(default)]
    pub illness_ru: Vec<String>,
    #[serde(default)]
    pub illness_en: Vec<String>,
    #[serde(default)]
    pub composition_uz: Vec<String>,
    #[serde(default)]
    pub composition_ru: Vec<String>,
    #[serde(default)]
    pub composition_en: Vec<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_links"))]
    pub links: Vec<String>,
    #[validate(range(min = 0))]
    pub price: i32,
    #[validate(range(min = 0))]
    pub old_price: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub total: i32,
    pub new: Option<bool>,
    #[serde(default)]
    pub age_range: AgeRange,
    pub category_id: Uuid,
    #[serde(default)]
    pub tags: Vec<Uuid>,
}

/// Query parameters for product listings
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// `true` keeps discounted products, `false` the rest
    pub has_old_price: Option<bool>,
    pub new: Option<bool>,
    pub price_min: Option<i32>,
    pub price_max: Option<i32>,
    /// Minimum average rating
    pub average_rating: Option<f64>,
    pub search: Option<String>,
    /// Comma-separated tag ids; products must carry all of them
    pub tags: Option<String>,
    /// Matches a tag name in any language
    pub tag_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_age_range")]
    pub age_range: Option<AgeRange>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ProductFilter {
    /// Tag ids from the `tags` parameter.
    pub fn tag_ids(&self) -> Result<Vec<Uuid>, uuid::Error> {
        match &self.tags {
            None => Ok(Vec::new()),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Uuid::parse_str)
                .collect(),
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }
}

/// Listing filters and paging, all applied in SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    /// Exact category; descendants are not included
    pub category_id: Option<Uuid>,
    pub has_old_price: Option<bool>,
    pub new: Option<bool>,
    pub price_min: Option<i32>,
    pub price_max: Option<i32>,
    pub age_range: Option<AgeRange>,
    pub search: Option<String>,
    /// Products must carry every one of these tags
    pub tag_ids: Vec<Uuid>,
    pub tag_name: Option<String>,
    pub min_rating: Option<f64>,
    pub limit: u64,
    pub offset: u64,
}

impl ProductQuery {
    /// Builds the query from request parameters, failing on malformed tag ids.
    pub fn from_filter(filter: &ProductFilter) -> Result<Self, uuid::Error> {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            category_id: None,
            has_old_price: filter.has_old_price,
            new: filter.new,
            price_min: filter.price_min,
            price_max: filter.price_max,
            age_range: filter.age_range,
            search: non_blank(&filter.search),
            tag_ids: filter.tag_ids()?,
            tag_name: non_blank(&filter.tag_name),
            min_rating: filter.average_rating,
            limit: filter.limit(),
            offset: filter.offset(),
        })
    }
}

// ============================================================================
// Comments
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Absent once the author's account is gone
    pub user_id: Option<Uuid>,
    pub text: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CommentInput {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
    #[validate(range(min = 1.0, max = 5.0))]
    pub rating: f64,
}

// ============================================================================
// FAQ
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Faq {
    pub id: Uuid,
    pub question_uz: String,
    pub question_ru: String,
    pub question_en: String,
    pub answer_uz: String,
    pub answer_ru: String,
    pub answer_en: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct FaqInput {
    #[validate(length(min = 1))]
    pub question_uz: String,
    #[validate(length(min = 1))]
    pub question_ru: String,
    #[validate(length(min = 1))]
    pub question_en: String,
    #[validate(length(min = 1))]
    pub answer_uz: String,
    #[validate(length(min = 1))]
    pub answer_ru: String,
    #[validate(length(min = 1))]
    pub answer_en: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: Uuid, parent_id: Option<Uuid>, name: &str) -> Category {
        Category {
            id,
            parent_id,
            name_uz: name.to_string(),
            name_ru: name.to_string(),
            name_en: name.to_string(),
            image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_age_range_wire_format() {
        assert_eq!(serde_json::to_string(&AgeRange::Adults).unwrap(), "\"18+\"");
        assert_eq!(AgeRange::try_from("3-7").unwrap(), AgeRange::YoungChildren);
        assert!(AgeRange::try_from("99+").is_err());
        assert_eq!(AgeRange::Teenagers.to_string(), "13-17");
        assert_eq!(AgeRange::default(), AgeRange::Adults);
    }

    #[test]
    fn test_category_tree_nests_descendants() {
        let root = Uuid::now_v7();
        let child = Uuid::now_v7();
        let grandchild = Uuid::now_v7();
        let other = Uuid::now_v7();
        let all = vec![
            category(root, None, "Medicine"),
            category(child, Some(root), "Painkillers"),
            category(grandchild, Some(child), "Tablets"),
            category(other, None, "Cosmetics"),
        ];

        let tree = CategoryTree::build(&all[0], &all);
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].children[0].id, grandchild);
        assert_eq!(tree.ids(), vec![root, child, grandchild]);
    }

    #[test]
    fn test_query_from_filter_normalizes_parameters() {
        let tag = Uuid::now_v7();
        let filter = ProductFilter {
            search: Some("  headache ".to_string()),
            tag_name: Some("   ".to_string()),
            tags: Some(tag.to_string()),
            average_rating: Some(4.5),
            limit: Some(0),
            offset: Some(20),
            ..Default::default()
        };

        let query = ProductQuery::from_filter(&filter).unwrap();
        assert_eq!(query.search.as_deref(), Some("headache"));
        assert_eq!(query.tag_name, None);
        assert_eq!(query.tag_ids, vec![tag]);
        assert_eq!(query.min_rating, Some(4.5));
        assert_eq!(query.limit, 1);
        assert_eq!(query.offset, 20);
        assert_eq!(query.category_id, None);
    }

    #[test]
    fn test_filter_accepts_form_decoded_adult_range() {
        let filter: ProductFilter =
            serde_json::from_value(serde_json::json!({"age_range": "18 "})).unwrap();
        assert_eq!(filter.age_range, Some(AgeRange::Adults));

        let filter: ProductFilter =
            serde_json::from_value(serde_json::json!({"age_range": "3-7"})).unwrap();
        assert_eq!(filter.age_range, Some(AgeRange::YoungChildren));
    }

    #[test]
    fn test_filter_tag_ids_and_paging() {
        let id = Uuid::now_v7();
        let filter = ProductFilter {
            tags: Some(format!("{id}, ")),
            limit: Some(1000),
            ..Default::default()
        };
        assert_eq!(filter.tag_ids().unwrap(), vec![id]);
        assert_eq!(filter.limit(), MAX_PAGE_SIZE);
        assert_eq!(filter.offset(), 0);
        assert_eq!(ProductFilter::default().limit(), DEFAULT_PAGE_SIZE);

        let bad = ProductFilter {
            tags: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(bad.tag_ids().is_err());
    }

    #[test]
    fn test_comment_rating_bounds() {
        let ok = CommentInput {
            text: "Helped quickly".to_string(),
            rating: 5.0,
        };
        assert!(ok.validate().is_ok());

        for rating in [0.9, 5.1] {
            let bad = CommentInput {
                text: "x".to_string(),
                rating,
            };
            assert!(bad.validate().is_err(), "rating {rating} must be rejected");
        }
    }

    #[test]
    fn test_product_input_rejects_negative_stock_and_bad_links() {
        let input: ProductInput = serde_json::from_value(serde_json::json!({
            "title": "Aspirin",
            "price": 5000,
            "total": -1,
            "links": ["ftp://example.com"],
            "category_id": Uuid::now_v7(),
        }))
        .unwrap();

        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("total"));
        assert!(fields.contains_key("links"));
        assert_eq!(input.age_range, AgeRange::Adults);
    }
}
