use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ChatError, ChatResult};
use crate::models::{Chat, ChatDetail, CreateMessage, Message};
use crate::repository::ChatRepository;

#[derive(Clone)]
pub struct ChatService<R: ChatRepository> {
    repository: Arc<R>,
}

impl<R: ChatRepository> ChatService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn chats(&self, viewer: Uuid) -> ChatResult<Vec<Chat>> {
        self.repository.chats_of(viewer).await
    }

    pub async fn chat(&self, id: Uuid, viewer: Uuid) -> ChatResult<ChatDetail> {
        let chat = self.participant_chat(id, viewer).await?;
        let messages = self.repository.chat_messages(chat.id).await?;
        Ok(ChatDetail { chat, messages })
    }

    /// Returns the chat and whether it was newly created.
    pub async fn start_chat(
        &self,
        viewer: Uuid,
        viewer_is_user: bool,
        specialist: Uuid,
    ) -> ChatResult<(Chat, bool)> {
        if !viewer_is_user {
            return Err(ChatError::OnlyUsersStartChats);
        }
        if !self.repository.is_specialist(specialist).await? {
            return Err(ChatError::SpecialistNotFound);
        }

        if let Some(existing) = self
            .repository
            .find_chat_between(viewer, specialist)
            .await?
        {
            return Ok((existing, false));
        }
        let chat = self.repository.create_chat(viewer, specialist).await?;
        Ok((chat, true))
    }

    pub async fn delete_chat(&self, id: Uuid, viewer: Uuid) -> ChatResult<()> {
        let chat = self.participant_chat(id, viewer).await?;
        self.repository.delete_chat(chat.id).await?;
        Ok(())
    }

    pub async fn messages(&self, viewer: Uuid, chat_id: Option<Uuid>) -> ChatResult<Vec<Message>> {
        self.repository.messages_of(viewer, chat_id).await
    }

    pub async fn message(&self, id: Uuid, viewer: Uuid) -> ChatResult<Message> {
        self.visible_message(id, viewer).await
    }

    pub async fn send(&self, viewer: Uuid, input: CreateMessage) -> ChatResult<Message> {
        let text = non_blank(input.text)?;
        let chat = self
            .repository
            .find_chat(input.chat)
            .await?
            .ok_or(ChatError::UnknownChat)?;
        if !chat.is_participant(viewer) {
            return Err(ChatError::NotParticipant);
        }
        self.repository.create_message(chat.id, viewer, text).await
    }

    pub async fn edit(&self, id: Uuid, viewer: Uuid, text: String) -> ChatResult<Message> {
        let text = non_blank(text)?;
        let message = self.sent_message(id, viewer).await?;
        self.repository.update_message(message.id, text).await
    }

    pub async fn delete_message(&self, id: Uuid, viewer: Uuid) -> ChatResult<()> {
        let message = self.sent_message(id, viewer).await?;
        self.repository.delete_message(message.id).await?;
        Ok(())
    }

    /// Only the participant who did not send the message may mark it read.
    pub async fn mark_read(&self, id: Uuid, viewer: Uuid) -> ChatResult<Message> {
        let message = self.visible_message(id, viewer).await?;
        if message.sender_id == viewer {
            return Err(ChatError::NotRecipient);
        }
        self.repository.mark_read(message.id).await
    }

    async fn participant_chat(&self, id: Uuid, viewer: Uuid) -> ChatResult<Chat> {
        self.repository
            .find_chat(id)
            .await?
            .filter(|chat| chat.is_participant(viewer))
            .ok_or(ChatError::ChatNotFound(id))
    }

    async fn visible_message(&self, id: Uuid, viewer: Uuid) -> ChatResult<Message> {
        let message = self
            .repository
            .find_message(id)
            .await?
            .ok_or(ChatError::MessageNotFound(id))?;
        self.repository
            .find_chat(message.chat_id)
            .await?
            .filter(|chat| chat.is_participant(viewer))
            .ok_or(ChatError::MessageNotFound(id))?;
        Ok(message)
    }

    /// Outsiders get `MessageNotFound`; participants other than the sender `NotSender`.
    async fn sent_message(&self, id: Uuid, viewer: Uuid) -> ChatResult<Message> {
        let message = self.visible_message(id, viewer).await?;
        if message.sender_id != viewer {
            return Err(ChatError::NotSender);
        }
        Ok(message)
    }
}

/// Rejects whitespace-only text; accepted text is stored as sent.
fn non_blank(text: String) -> ChatResult<String> {
    if text.trim().is_empty() {
        return Err(ChatError::BlankMessage);
    }
    Ok(text)
}
