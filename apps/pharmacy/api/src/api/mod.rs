use axum::Router;

pub mod banners;
pub mod cart;
pub mod catalog;
pub mod chat;
pub mod health;
pub mod orders;
pub mod users;

/// Domain routes without the `/api` prefix, which `create_router` adds.
///
/// Every sub-router already has its state applied.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .merge(catalog::router(state))
        .merge(chat::router(state))
        .nest("/users", users::router(state))
        .nest("/banners", banners::router(state))
        .nest("/cart", cart::router(state))
        .nest("/orders", orders::router(state))
}

/// `/ready` with real Postgres and Redis checks.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
