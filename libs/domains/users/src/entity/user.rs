use crate::models::{NewUser, User, UserRole};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub surname: String,
    pub phone_number: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub avatar: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub otp_code: Option<String>,
    pub otp_created_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub const TAG: &'static str = "users";
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            surname: model.surname,
            phone_number: model.phone_number,
            avatar: model.avatar,
            role: model.role,
            password_hash: model.password_hash,
            otp_code: model.otp_code,
            otp_created_at: model.otp_created_at.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<NewUser> for ActiveModel {
    fn from(input: NewUser) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(input.email),
            name: Set(input.name),
            surname: Set(input.surname),
            phone_number: Set(input.phone_number),
            avatar: Set(input.avatar),
            role: Set(input.role),
            password_hash: Set(input.password_hash),
            otp_code: Set(Some(input.otp_code)),
            otp_created_at: Set(Some(input.otp_created_at.into())),
            ..Default::default()
        }
    }
}
