use async_trait::async_trait;
use database::BaseRepository;
use domain_users::{UserRole, entity::user};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    entity::{chat, message},
    error::{ChatError, ChatResult},
    models::{Chat, Message},
    repository::ChatRepository,
};

pub struct PgChatRepository {
    base: BaseRepository<chat::Entity>,
}

impl PgChatRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }

    async fn message_model(&self, id: Uuid) -> ChatResult<message::Model> {
        message::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or(ChatError::MessageNotFound(id))
    }
}

fn participant_of(participant: Uuid) -> Condition {
    Condition::any()
        .add(chat::Column::UserId.eq(participant))
        .add(chat::Column::SpecialistId.eq(participant))
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    async fn chats_of(&self, participant: Uuid) -> ChatResult<Vec<Chat>> {
        let models = chat::Entity::find()
            .filter(participant_of(participant))
            .order_by_desc(chat::Column::CreatedAt)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_chat(&self, id: Uuid) -> ChatResult<Option<Chat>> {
        Ok(self.base.find_by_id(id).await?.map(Into::into))
    }

    async fn find_chat_between(
        &self,
        user_id: Uuid,
        specialist_id: Uuid,
    ) -> ChatResult<Option<Chat>> {
        Ok(chat::Entity::find()
            .filter(chat::Column::UserId.eq(user_id))
            .filter(chat::Column::SpecialistId.eq(specialist_id))
            .one(self.db())
            .await?
            .map(Into::into))
    }

    async fn create_chat(&self, user_id: Uuid, specialist_id: Uuid) -> ChatResult<Chat> {
        chat::Entity::insert(chat::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            specialist_id: Set(specialist_id),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([chat::Column::UserId, chat::Column::SpecialistId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.db())
        .await?;

        let chat = self
            .find_chat_between(user_id, specialist_id)
            .await?
            .ok_or_else(|| ChatError::Database(sea_orm::DbErr::RecordNotFound("chat".into())))?;
        tracing::info!(chat_id = %chat.id, user_id = %user_id, specialist_id = %specialist_id, "Created chat");
        Ok(chat)
    }

    async fn delete_chat(&self, id: Uuid) -> ChatResult<bool> {
        Ok(self.base.delete_by_id(id).await?)
    }

    async fn is_specialist(&self, user_id: Uuid) -> ChatResult<bool> {
        let found = user::Entity::find_by_id(user_id)
            .filter(user::Column::Role.eq(UserRole::Specialist))
            .one(self.db())
            .await?;
        Ok(found.is_some())
    }

    async fn chat_messages(&self, chat_id: Uuid) -> ChatResult<Vec<Message>> {
        let models = message::Entity::find()
            .filter(message::Column::ChatId.eq(chat_id))
            .order_by_asc(message::Column::CreatedAt)
            .order_by_asc(message::Column::Id)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn messages_of(
        &self,
        participant: Uuid,
        chat_id: Option<Uuid>,
    ) -> ChatResult<Vec<Message>> {
        let mut chats = chat::Entity::find()
            .select_only()
            .column(chat::Column::Id)
            .filter(participant_of(participant));
        if let Some(chat_id) = chat_id {
            chats = chats.filter(chat::Column::Id.eq(chat_id));
        }
        let chat_ids: Vec<Uuid> = chats.into_tuple().all(self.db()).await?;
        if chat_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = message::Entity::find()
            .filter(message::Column::ChatId.is_in(chat_ids))
            .order_by_asc(message::Column::CreatedAt)
            .order_by_asc(message::Column::Id)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_message(&self, id: Uuid) -> ChatResult<Option<Message>> {
        Ok(message::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .map(Into::into))
    }

    async fn create_message(
        &self,
        chat_id: Uuid,
        sender_id: Uuid,
        text: String,
    ) -> ChatResult<Message> {
        let model = message::ActiveModel {
            id: Set(Uuid::now_v7()),
            chat_id: Set(chat_id),
            sender_id: Set(sender_id),
            text: Set(text),
            is_read: Set(false),
            ..Default::default()
        }
        .insert(self.db())
        .await?;
        Ok(model.into())
    }

    async fn update_message(&self, id: Uuid, text: String) -> ChatResult<Message> {
        let mut active = self.message_model(id).await?.into_active_model();
        active.text = Set(text);
        Ok(active.update(self.db()).await?.into())
    }

    async fn mark_read(&self, id: Uuid) -> ChatResult<Message> {
        let mut active = self.message_model(id).await?.into_active_model();
        active.is_read = Set(true);
        Ok(active.update(self.db()).await?.into())
    }

    async fn delete_message(&self, id: Uuid) -> ChatResult<bool> {
        let result = message::Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(result.rows_affected > 0)
    }
}
