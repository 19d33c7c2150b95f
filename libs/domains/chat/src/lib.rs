//! Chat Domain
//!
//! One conversation per customer and specialist pair. Only customers open
//! chats; both participants can post. A message can be edited or deleted by
//! its sender and marked read by the other participant. Chats and messages
//! of other people answer 404.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ChatError, ChatResult};
pub use models::{Chat, ChatDetail, CreateChat, CreateMessage, Message, UpdateMessage};
pub use postgres::PgChatRepository;
pub use repository::ChatRepository;
pub use service::ChatService;
