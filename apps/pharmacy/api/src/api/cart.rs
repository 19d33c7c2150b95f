use axum::Router;
use domain_cart::{CartService, PgCartRepository, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgCartRepository::new(state.db.clone());
    let service = CartService::new(repository, state.notifier.clone());
    handlers::router(service, state.auth.clone())
}
