use axum_helpers::server::{create_production_app, health_router};
use axum_helpers::{JwtAuth, RedisTokenStore};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_notifications::{Mailer, SmtpProvider, TemplateEngine, notifier_from_env};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible operation so startup errors are colored too
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let postgres_future = async {
        database::postgres::connect_from_config_with_retry(config.database.clone(), None)
            .await
            .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))
    };

    let redis_future = async {
        database::redis::connect_with_retry(&config.redis.url, None)
            .await
            .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))
    };

    let (db, redis) = tokio::try_join!(postgres_future, redis_future)?;

    if config.run_migrations {
        database::postgres::run_migrations::<migration::Migrator>(&db, &config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;
    }

    let auth = JwtAuth::new(&config.jwt, Arc::new(RedisTokenStore::new(redis.clone())));

    let templates = Arc::new(
        TemplateEngine::new().map_err(|e| eyre::eyre!("Failed to load templates: {}", e))?,
    );
    let smtp = SmtpProvider::new(config.smtp.clone())
        .map_err(|e| eyre::eyre!("Failed to configure SMTP: {}", e))?;
    let mailer = Mailer::new(Arc::new(smtp), templates.clone(), config.otp.ttl_secs);
    let notifier = notifier_from_env(templates)
        .map_err(|e| eyre::eyre!("Failed to configure order notifier: {}", e))?;

    let state = AppState {
        config,
        db,
        redis,
        auth,
        mailer,
        notifier,
    };

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes, &state.config.cors);

    // /health is liveness only, /ready pings Postgres and Redis
    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(api::ready_router(state.clone()));

    info!("Starting pharmacy API with graceful shutdown (30s timeout)");

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");

            tokio::join!(
                async {
                    match state.db.close().await {
                        Ok(_) => info!("PostgreSQL connection closed successfully"),
                        Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
                    }
                },
                async {
                    // ConnectionManager closes on drop
                    drop(state.redis);
                    info!("Redis connection closed successfully");
                }
            );
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Pharmacy API shutdown complete");
    Ok(())
}
