use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    #[error("Tag not found: {0}")]
    TagNotFound(Uuid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Comment not found: {0}")]
    CommentNotFound(Uuid),

    #[error("FAQ entry not found: {0}")]
    FaqNotFound(Uuid),

    /// A category would become its own ancestor.
    #[error("A category cannot be moved under itself or one of its descendants")]
    CategoryCycle,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Only the author can change comment {0}")]
    NotCommentAuthor(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound(id) => {
                AppError::NotFound(format!("Category {} not found", id))
            }
            CatalogError::TagNotFound(id) => AppError::NotFound(format!("Tag {} not found", id)),
            CatalogError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product {} not found", id))
            }
            CatalogError::CommentNotFound(id) => {
                AppError::NotFound(format!("Comment {} not found", id))
            }
            CatalogError::FaqNotFound(id) => {
                AppError::NotFound(format!("FAQ entry {} not found", id))
            }
            CatalogError::CategoryCycle => AppError::BadRequest(
                "A category cannot be moved under itself or one of its descendants".to_string(),
            ),
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::NotCommentAuthor(_) => {
                AppError::Forbidden("You can only modify your own comments".to_string())
            }
            CatalogError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
