use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ChatResult;
use crate::models::{Chat, Message};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Chats the user takes part in, newest first.
    async fn chats_of(&self, participant: Uuid) -> ChatResult<Vec<Chat>>;

    async fn find_chat(&self, id: Uuid) -> ChatResult<Option<Chat>>;

    async fn find_chat_between(&self, user_id: Uuid, specialist_id: Uuid) -> ChatResult<Option<Chat>>;

    async fn create_chat(&self, user_id: Uuid, specialist_id: Uuid) -> ChatResult<Chat>;

    async fn delete_chat(&self, id: Uuid) -> ChatResult<bool>;

    async fn is_specialist(&self, user_id: Uuid) -> ChatResult<bool>;

    /// Oldest first.
    async fn chat_messages(&self, chat_id: Uuid) -> ChatResult<Vec<Message>>;

    /// Messages from every chat of `participant`, optionally one chat only.
    async fn messages_of(&self, participant: Uuid, chat_id: Option<Uuid>) -> ChatResult<Vec<Message>>;

    async fn find_message(&self, id: Uuid) -> ChatResult<Option<Message>>;

    async fn create_message(&self, chat_id: Uuid, sender_id: Uuid, text: String) -> ChatResult<Message>;

    async fn update_message(&self, id: Uuid, text: String) -> ChatResult<Message>;

    async fn mark_read(&self, id: Uuid) -> ChatResult<Message>;

    async fn delete_message(&self, id: Uuid) -> ChatResult<bool>;
}
