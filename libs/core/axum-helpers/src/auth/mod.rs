//! JWT authentication with a whitelist/blacklist token store.
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, RedisTokenStore, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?, Arc::new(RedisTokenStore::new(redis)));
//!
//! let protected = Router::new()
//!     .route("/profile", get(handler))
//!     .route_layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod store;

pub use config::JwtConfig;
pub use jwt::{
    ACCESS_TOKEN_TTL, AuthError, JwtAuth, JwtClaims, REFRESH_TOKEN_TTL, TokenPair, TokenType,
};
pub use middleware::{jwt_auth_middleware, optional_jwt_auth_middleware};
pub use store::{InMemoryTokenStore, RedisTokenStore, TokenStore};
