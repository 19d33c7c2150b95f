//! # Axum Helpers
//!
//! Shared HTTP plumbing for the pharmacy services.
//!
//! - **[`auth`]**: JWT access/refresh tokens with a whitelist/blacklist store
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: `AppError` and the shared `ErrorResponse` body
//! - **[`extractors`]**: `UuidPath`, `ValidatedJson`, `CurrentUser`
//! - **[`audit`]**: audit trail events

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    ACCESS_TOKEN_TTL, AuthError, InMemoryTokenStore, JwtAuth, JwtClaims, JwtConfig,
    REFRESH_TOKEN_TTL, RedisTokenStore, TokenPair, TokenStore, TokenType, jwt_auth_middleware,
    optional_jwt_auth_middleware,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{CorsConfig, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{CurrentUser, UuidPath, ValidatedJson};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
