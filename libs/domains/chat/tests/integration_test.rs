//! Integration tests for chats against a real Postgres.

use domain_chat::*;
use test_utils::{TestDataBuilder, TestDatabase};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_conversation_flow() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("chat_flow");
    let user = db.create_user(&builder.email("patient"), "user").await;
    let specialist = db.create_user(&builder.email("doctor"), "specialist").await;
    let service = ChatService::new(PgChatRepository::new(db.connection()));

    let (chat, created) = service.start_chat(user, true, specialist).await.unwrap();
    assert!(created);
    let (again, created) = service.start_chat(user, true, specialist).await.unwrap();
    assert!(!created);
    assert_eq!(again.id, chat.id);

    let question = service
        .send(
            user,
            CreateMessage {
                chat: chat.id,
                text: "Is this safe for children?".to_string(),
            },
        )
        .await
        .unwrap();
    service
        .send(
            specialist,
            CreateMessage {
                chat: chat.id,
                text: "Only from 12 years".to_string(),
            },
        )
        .await
        .unwrap();

    let read = service.mark_read(question.id, specialist).await.unwrap();
    assert!(read.is_read);

    let detail = service.chat(chat.id, user).await.unwrap();
    assert_eq!(detail.messages.len(), 2);
    assert_eq!(detail.messages[0].id, question.id);

    let filtered = service.messages(specialist, Some(chat.id)).await.unwrap();
    assert_eq!(filtered.len(), 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_chat_requires_real_specialist() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("chat_specialist_check");
    let user = db.create_user(&builder.email("patient"), "user").await;
    let other_user = db.create_user(&builder.email("neighbour"), "user").await;
    let service = ChatService::new(PgChatRepository::new(db.connection()));

    let result = service.start_chat(user, true, other_user).await;

    assert!(matches!(result, Err(ChatError::SpecialistNotFound)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_deleting_chat_removes_messages() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("chat_delete");
    let user = db.create_user(&builder.email("patient"), "user").await;
    let specialist = db.create_user(&builder.email("doctor"), "specialist").await;
    let outsider = db.create_user(&builder.email("outsider"), "user").await;
    let service = ChatService::new(PgChatRepository::new(db.connection()));

    let (chat, _) = service.start_chat(user, true, specialist).await.unwrap();
    let message = service
        .send(
            user,
            CreateMessage {
                chat: chat.id,
                text: "Hello".to_string(),
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        service.delete_chat(chat.id, outsider).await,
        Err(ChatError::ChatNotFound(_))
    ));
    service.delete_chat(chat.id, specialist).await.unwrap();

    assert!(matches!(
        service.message(message.id, user).await,
        Err(ChatError::MessageNotFound(_))
    ));
}
