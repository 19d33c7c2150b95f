use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use axum_helpers::{
    AppError, CurrentUser, JwtAuth, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::models::{
    Chat, ChatDetail, CreateChat, CreateMessage, Message, MessageQuery, UpdateMessage,
};
use crate::repository::ChatRepository;
use crate::service::ChatService;

const USER: &str = "user";

/// OpenAPI documentation for the chat endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        list_chats,
        get_chat,
        create_chat,
        delete_chat,
        list_messages,
        get_message,
        create_message,
        update_message,
        delete_message,
        mark_read,
    ),
    components(
        schemas(Chat, ChatDetail, CreateChat, Message, CreateMessage, UpdateMessage),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::chat::Model::TAG, description = "Customer to specialist conversations"),
        (name = entity::message::Model::TAG, description = "Chat messages")
    )
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<ChatService<R>>>;

pub fn router<R: ChatRepository + 'static>(service: ChatService<R>, auth: JwtAuth) -> Router {
    Router::new()
        .route("/chats", get(list_chats).post(create_chat))
        .route("/chats/{id}", get(get_chat).delete(delete_chat))
        .route("/messages", get(list_messages).post(create_message))
        .route(
            "/messages/{id}",
            get(get_message).put(update_message).delete(delete_message),
        )
        .route("/messages/{id}/read", post(mark_read))
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware))
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "/chats",
    tag = entity::chat::Model::TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Chats of the caller", body = Vec<Chat>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_chats<R: ChatRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
) -> Result<Json<Vec<Chat>>, AppError> {
    Ok(Json(service.chats(user.id).await?))
}

/// A chat with its messages
#[utoipa::path(
    get,
    path = "/chats/{id}",
    tag = entity::chat::Model::TAG,
    params(("id" = Uuid, Path, description = "Chat ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Chat", body = ChatDetail),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_chat<R: ChatRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> Result<Json<ChatDetail>, AppError> {
    Ok(Json(service.chat(id, user.id).await?))
}

/// Open a chat with a specialist, or get the existing one
#[utoipa::path(
    post,
    path = "/chats",
    tag = entity::chat::Model::TAG,
    request_body = CreateChat,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Existing chat", body = Chat),
        (status = 201, description = "Chat created", body = Chat),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_chat<R: ChatRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateChat>,
) -> Result<(StatusCode, Json<Chat>), AppError> {
    let (chat, created) = service
        .start_chat(user.id, user.has_role(USER), input.specialist)
        .await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(chat)))
}

#[utoipa::path(
    delete,
    path = "/chats/{id}",
    tag = entity::chat::Model::TAG,
    params(("id" = Uuid, Path, description = "Chat ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Chat deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_chat<R: ChatRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> Result<StatusCode, AppError> {
    service.delete_chat(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Messages across the caller's chats
#[utoipa::path(
    get,
    path = "/messages",
    tag = entity::message::Model::TAG,
    params(MessageQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Messages, oldest first", body = Vec<Message>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_messages<R: ChatRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Vec<Message>>, AppError> {
    Ok(Json(service.messages(user.id, query.chat).await?))
}

#[utoipa::path(
    get,
    path = "/messages/{id}",
    tag = entity::message::Model::TAG,
    params(("id" = Uuid, Path, description = "Message ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Message", body = Message),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_message<R: ChatRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> Result<Json<Message>, AppError> {
    Ok(Json(service.message(id, user.id).await?))
}

#[utoipa::path(
    post,
    path = "/messages",
    tag = entity::message::Model::TAG,
    request_body = CreateMessage,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_message<R: ChatRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateMessage>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let message = service.send(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    put,
    path = "/messages/{id}",
    tag = entity::message::Model::TAG,
    params(("id" = Uuid, Path, description = "Message ID")),
    request_body = UpdateMessage,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Message edited", body = Message),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_message<R: ChatRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateMessage>,
) -> Result<Json<Message>, AppError> {
    Ok(Json(service.edit(id, user.id, input.text).await?))
}

#[utoipa::path(
    delete,
    path = "/messages/{id}",
    tag = entity::message::Model::TAG,
    params(("id" = Uuid, Path, description = "Message ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_message<R: ChatRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> Result<StatusCode, AppError> {
    service.delete_message(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a received message as read
#[utoipa::path(
    post,
    path = "/messages/{id}/read",
    tag = entity::message::Model::TAG,
    params(("id" = Uuid, Path, description = "Message ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Message marked read", body = Message),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn mark_read<R: ChatRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> Result<Json<Message>, AppError> {
    Ok(Json(service.mark_read(id, user.id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockChatRepository;
    use crate::service::tests::{chat_between, message_in};
    use axum::body::Body;
    use axum::http::Request;
    use axum_helpers::{InMemoryTokenStore, JwtConfig};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn auth() -> JwtAuth {
        let config = JwtConfig::new("chat-handler-test-secret-0123456789abc").unwrap();
        JwtAuth::new(&config, Arc::new(InMemoryTokenStore::new()))
    }

    async fn bearer(auth: &JwtAuth, id: Uuid, role: &str) -> String {
        let user = CurrentUser::new(id, "kamola@example.com", "Kamola", role);
        let pair = auth.issue_pair(&user).await.unwrap();
        format!("Bearer {}", pair.access)
    }

    fn post_json(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", token)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_new_chat_is_created() {
        let auth = auth();
        let user = Uuid::now_v7();
        let specialist = Uuid::now_v7();
        let token = bearer(&auth, user, "user").await;
        let mut mock_repo = MockChatRepository::new();
        mock_repo.expect_is_specialist().returning(|_| Ok(true));
        mock_repo
            .expect_find_chat_between()
            .returning(|_, _| Ok(None));
        mock_repo
            .expect_create_chat()
            .times(1)
            .returning(|u, s| Ok(chat_between(u, s)));

        let response = router(ChatService::new(mock_repo), auth)
            .oneshot(post_json("/chats", &token, json!({"specialist": specialist})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let chat: Chat = serde_json::from_slice(&body).unwrap();
        assert_eq!(chat.user_id, user);
        assert_eq!(chat.specialist_id, specialist);
    }

    #[tokio::test]
    async fn test_existing_chat_is_ok() {
        let auth = auth();
        let user = Uuid::now_v7();
        let specialist = Uuid::now_v7();
        let token = bearer(&auth, user, "user").await;
        let existing = chat_between(user, specialist);
        let mut mock_repo = MockChatRepository::new();
        mock_repo.expect_is_specialist().returning(|_| Ok(true));
        mock_repo
            .expect_find_chat_between()
            .returning(move |_, _| Ok(Some(existing.clone())));

        let response = router(ChatService::new(mock_repo), auth)
            .oneshot(post_json("/chats", &token, json!({"specialist": specialist})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_specialist_cannot_open_chat() {
        let auth = auth();
        let token = bearer(&auth, Uuid::now_v7(), "specialist").await;

        let response = router(ChatService::new(MockChatRepository::new()), auth)
            .oneshot(post_json("/chats", &token, json!({"specialist": Uuid::now_v7()})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_malformed_chat_body_is_json_error() {
        let auth = auth();
        let token = bearer(&auth, Uuid::now_v7(), "user").await;
        let mut mock_repo = MockChatRepository::new();
        mock_repo.expect_create_chat().never();

        let response = router(ChatService::new(mock_repo), auth)
            .oneshot(post_json("/chats", &token, json!({"specialist": "nobody"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "JSON_EXTRACTION");
    }

    #[tokio::test]
    async fn test_blank_message_is_bad_request() {
        let auth = auth();
        let token = bearer(&auth, Uuid::now_v7(), "user").await;
        let mut mock_repo = MockChatRepository::new();
        mock_repo.expect_create_message().never();

        let response = router(ChatService::new(mock_repo), auth)
            .oneshot(post_json(
                "/messages",
                &token,
                json!({"chat": Uuid::now_v7(), "text": "   "}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recipient_marks_message_read() {
        let auth = auth();
        let user = Uuid::now_v7();
        let specialist = Uuid::now_v7();
        let token = bearer(&auth, specialist, "specialist").await;
        let chat = chat_between(user, specialist);
        let message = message_in(&chat, user);
        let message_id = message.id;
        let read = Message {
            is_read: true,
            ..message.clone()
        };

        let mut mock_repo = MockChatRepository::new();
        mock_repo
            .expect_find_message()
            .returning(move |_| Ok(Some(message.clone())));
        mock_repo
            .expect_find_chat()
            .returning(move |_| Ok(Some(chat.clone())));
        mock_repo
            .expect_mark_read()
            .returning(move |_| Ok(read.clone()));

        let response = router(ChatService::new(mock_repo), auth)
            .oneshot(post_json(
                &format!("/messages/{}/read", message_id),
                &token,
                json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let message: Message = serde_json::from_slice(&body).unwrap();
        assert!(message.is_read);
    }
}
