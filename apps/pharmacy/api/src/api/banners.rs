use axum::Router;
use domain_banners::{BannerService, PgBannerRepository, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgBannerRepository::new(state.db.clone());
    handlers::router(BannerService::new(repository), state.auth.clone())
}
