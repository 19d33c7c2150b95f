use crate::models::{Faq, FaqInput};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faqs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub question_uz: String,
    #[sea_orm(column_type = "Text")]
    pub question_ru: String,
    #[sea_orm(column_type = "Text")]
    pub question_en: String,
    #[sea_orm(column_type = "Text")]
    pub answer_uz: String,
    #[sea_orm(column_type = "Text")]
    pub answer_ru: String,
    #[sea_orm(column_type = "Text")]
    pub answer_en: String,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub const TAG: &'static str = "faq";
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Faq {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            question_uz: model.question_uz,
            question_ru: model.question_ru,
            question_en: model.question_en,
            answer_uz: model.answer_uz,
            answer_ru: model.answer_ru,
            answer_en: model.answer_en,
        }
    }
}

impl From<FaqInput> for ActiveModel {
    fn from(input: FaqInput) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            question_uz: Set(input.question_uz),
            question_ru: Set(input.question_ru),
            question_en: Set(input.question_en),
            answer_uz: Set(input.answer_uz),
            answer_ru: Set(input.answer_ru),
            answer_en: Set(input.answer_en),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
