use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_orders::OrderError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Cart item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Not enough stock")]
    NotEnoughStock,

    #[error("Cart is empty")]
    Empty,

    #[error("Cart is being modified concurrently")]
    Contended,

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type CartResult<T> = Result<T, CartError>;

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product {} not found", id))
            }
            CartError::ItemNotFound(_) => AppError::NotFound("Cart item not found".to_string()),
            CartError::NotEnoughStock => AppError::BadRequest("Not enough stock".to_string()),
            CartError::Empty => AppError::BadRequest("Cart is empty".to_string()),
            CartError::Contended => {
                AppError::Conflict("Cart is being modified concurrently".to_string())
            }
            CartError::Order(e) => e.into(),
            CartError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for CartError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
