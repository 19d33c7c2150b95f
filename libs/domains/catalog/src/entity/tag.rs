use crate::models::{Tag, TagInput};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name_uz: String,
    pub name_ru: String,
    pub name_en: String,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub const TAG: &'static str = "tags";
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Tag {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name_uz: model.name_uz,
            name_ru: model.name_ru,
            name_en: model.name_en,
        }
    }
}

impl From<TagInput> for ActiveModel {
    fn from(input: TagInput) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            name_uz: Set(input.name_uz),
            name_ru: Set(input.name_ru),
            name_en: Set(input.name_en),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
