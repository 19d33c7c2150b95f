use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Also returned to non-participants, so foreign chats stay invisible.
    #[error("Chat not found: {0}")]
    ChatNotFound(Uuid),

    #[error("Message not found: {0}")]
    MessageNotFound(Uuid),

    /// The chat named in a new message does not exist.
    #[error("Chat not found")]
    UnknownChat,

    #[error("Specialist not found")]
    SpecialistNotFound,

    #[error("Only users can start a chat")]
    OnlyUsersStartChats,

    #[error("You are not a participant of this chat")]
    NotParticipant,

    #[error("Only the sender can change this message")]
    NotSender,

    #[error("Only the recipient can mark a message as read")]
    NotRecipient,

    #[error("Message text cannot be blank")]
    BlankMessage,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type ChatResult<T> = Result<T, ChatError>;

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::ChatNotFound(_) => AppError::NotFound("Chat not found".to_string()),
            ChatError::MessageNotFound(_) => AppError::NotFound("Message not found".to_string()),
            ChatError::UnknownChat | ChatError::SpecialistNotFound | ChatError::BlankMessage => {
                AppError::BadRequest(err.to_string())
            }
            ChatError::OnlyUsersStartChats
            | ChatError::NotParticipant
            | ChatError::NotSender
            | ChatError::NotRecipient => AppError::Forbidden(err.to_string()),
            ChatError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
