//! Connection management for the pharmacy backend's stores.
//!
//! - `postgres` (default): SeaORM pool, migrations, health check, [`BaseRepository`]
//! - `redis` (default): `ConnectionManager` used by the JWT token store
//! - `config` (default): `core_config::FromEnv` impls for the configs
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use core_config::FromEnv;
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<migration::Migrator>(&db, "pharmacy_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "postgres")]
pub mod repository;

#[cfg(feature = "redis")]
pub mod redis;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};

#[cfg(feature = "postgres")]
pub use repository::BaseRepository;
