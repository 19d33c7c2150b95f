//! Shared application state.

use axum_helpers::JwtAuth;
use domain_notifications::{Mailer, OrderNotifier};
use std::sync::Arc;

/// Cloned into every domain router at startup; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Backs the JWT whitelist and blacklist
    pub redis: database::redis::ConnectionManager,
    pub auth: JwtAuth,
    pub mailer: Mailer,
    pub notifier: Arc<dyn OrderNotifier>,
}
