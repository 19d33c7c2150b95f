use axum::Router;
use domain_users::{PgUserRepository, UserService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgUserRepository::new(state.db.clone());
    let service = UserService::new(
        repository,
        state.auth.clone(),
        state.mailer.clone(),
        state.config.otp,
    );
    handlers::router(service)
}
