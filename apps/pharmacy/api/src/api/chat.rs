use axum::Router;
use domain_chat::{ChatService, PgChatRepository, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgChatRepository::new(state.db.clone());
    handlers::router(ChatService::new(repository), state.auth.clone())
}
