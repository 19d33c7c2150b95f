use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BannerError {
    #[error("Banner not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type BannerResult<T> = Result<T, BannerError>;

impl From<BannerError> for AppError {
    fn from(err: BannerError) -> Self {
        match err {
            BannerError::NotFound(id) => AppError::NotFound(format!("Banner {} not found", id)),
            BannerError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for BannerError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
