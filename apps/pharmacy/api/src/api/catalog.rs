use axum::Router;
use domain_catalog::{CatalogService, PgCatalogRepository, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgCatalogRepository::new(state.db.clone());
    handlers::router(CatalogService::new(repository), state.auth.clone())
}
