use crate::models::{AgeRange, Product, ProductInput, ProductSummary, Tag};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description_uz: String,
    #[sea_orm(column_type = "Text")]
    pub description_ru: String,
    #[sea_orm(column_type = "Text")]
    pub description_en: String,
    #[sea_orm(column_type = "Text")]
    pub instruction_uz: String,
    #[sea_orm(column_type = "Text")]
    pub instruction_ru: String,
    #[sea_orm(column_type = "Text")]
    pub instruction_en: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub illness_uz: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub illness_ru: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub illness_en: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub composition_uz: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub composition_ru: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub composition_en: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub links: Json,
    pub price: i32,
    pub old_price: Option<i32>,
    pub total: i32,
    pub new: Option<bool>,
    pub age_range: AgeRange,
    pub category_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub const TAG: &'static str = "products";

    pub fn into_product(self, tags: Vec<Tag>, average_rating: Option<f64>) -> Product {
        Product {
            id: self.id,
            title: self.title,
            description_uz: self.description_uz,
            description_ru: self.description_ru,
            description_en: self.description_en,
            instruction_uz: self.instruction_uz,
            instruction_ru: self.instruction_ru,
            instruction_en: self.instruction_en,
            illness_uz: string_list(self.illness_uz),
            illness_ru: string_list(self.illness_ru),
            illness_en: string_list(self.illness_en),
            composition_uz: string_list(self.composition_uz),
            composition_ru: string_list(self.composition_ru),
            composition_en: string_list(self.composition_en),
            links: string_list(self.links),
            price: self.price,
            old_price: self.old_price,
            total: self.total,
            new: self.new,
            age_range: self.age_range,
            category_id: self.category_id,
            tags,
            average_rating,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn string_list(value: Json) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}

fn json_list(values: Vec<String>) -> Json {
    Json::Array(values.into_iter().map(Json::String).collect())
}

impl From<Model> for ProductSummary {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            price: model.price,
            old_price: model.old_price,
            total: model.total,
            new: model.new,
            age_range: model.age_range,
            category_id: model.category_id,
        }
    }
}

impl ActiveModel {
    /// Copies every column of `input` onto the model. Tags are stored separately.
    pub fn apply_input(&mut self, input: ProductInput) {
        self.title = Set(input.title);
        self.description_uz = Set(input.description_uz);
        self.description_ru = Set(input.description_ru);
        self.description_en = Set(input.description_en);
        self.instruction_uz = Set(input.instruction_uz);
        self.instruction_ru = Set(input.instruction_ru);
        self.instruction_en = Set(input.instruction_en);
        self.illness_uz = Set(json_list(input.illness_uz));
        self.illness_ru = Set(json_list(input.illness_ru));
        self.illness_en = Set(json_list(input.illness_en));
        self.composition_uz = Set(json_list(input.composition_uz));
        self.composition_ru = Set(json_list(input.composition_ru));
        self.composition_en = Set(json_list(input.composition_en));
        self.links = Set(json_list(input.links));
        self.price = Set(input.price);
        self.old_price = Set(input.old_price);
        self.total = Set(input.total);
        self.new = Set(input.new);
        self.age_range = Set(input.age_range);
        self.category_id = Set(input.category_id);
        self.updated_at = Set(chrono::Utc::now().into());
    }
}

impl From<ProductInput> for ActiveModel {
    fn from(input: ProductInput) -> Self {
        let mut model = ActiveModel {
            id: Set(Uuid::now_v7()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };
        model.apply_input(input);
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_list_tolerates_bad_json() {
        assert_eq!(string_list(serde_json::json!(["a", "b"])), vec!["a", "b"]);
        assert!(string_list(serde_json::json!({"not": "a list"})).is_empty());
        assert!(string_list(Json::Null).is_empty());
    }

    #[test]
    fn test_json_list_builds_array() {
        let json = json_list(vec!["Headache".to_string()]);
        assert_eq!(json, serde_json::json!(["Headache"]));
    }
}
