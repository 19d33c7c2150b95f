use crate::models::{Banner, CreateBanner};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "banners")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub image: String,
    pub title_uz: String,
    pub title_ru: String,
    pub title_en: String,
    #[sea_orm(column_type = "Text")]
    pub description_uz: String,
    #[sea_orm(column_type = "Text")]
    pub description_ru: String,
    #[sea_orm(column_type = "Text")]
    pub description_en: String,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub const TAG: &'static str = "banners";
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Banner {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            image: model.image,
            title_uz: model.title_uz,
            title_ru: model.title_ru,
            title_en: model.title_en,
            description_uz: model.description_uz,
            description_ru: model.description_ru,
            description_en: model.description_en,
            created_at: model.created_at.into(),
        }
    }
}

impl From<CreateBanner> for ActiveModel {
    fn from(input: CreateBanner) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            image: Set(input.image),
            title_uz: Set(input.title_uz),
            title_ru: Set(input.title_ru),
            title_en: Set(input.title_en),
            description_uz: Set(input.description_uz),
            description_ru: Set(input.description_ru),
            description_en: Set(input.description_en),
            ..Default::default()
        }
    }
}

impl From<Banner> for ActiveModel {
    fn from(banner: Banner) -> Self {
        ActiveModel {
            id: Set(banner.id),
            image: Set(banner.image),
            title_uz: Set(banner.title_uz),
            title_ru: Set(banner.title_ru),
            title_en: Set(banner.title_en),
            description_uz: Set(banner.description_uz),
            description_ru: Set(banner.description_ru),
            description_en: Set(banner.description_en),
            created_at: Set(banner.created_at.into()),
        }
    }
}
