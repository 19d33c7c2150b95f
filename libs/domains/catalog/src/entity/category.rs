use crate::models::{Category, CategoryInput};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name_uz: String,
    pub name_ru: String,
    pub name_en: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub image: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub const TAG: &'static str = "categories";
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            parent_id: model.parent_id,
            name_uz: model.name_uz,
            name_ru: model.name_ru,
            name_en: model.name_en,
            image: model.image,
            created_at: model.created_at.into(),
        }
    }
}

impl From<CategoryInput> for ActiveModel {
    fn from(input: CategoryInput) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            parent_id: Set(input.parent_id),
            name_uz: Set(input.name_uz),
            name_ru: Set(input.name_ru),
            name_en: Set(input.name_en),
            image: Set(input.image),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
