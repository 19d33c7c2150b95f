//! Banners Domain
//!
//! Multilingual promotional slides shown on the storefront. Anyone can read
//! them; only specialists manage them.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{BannerError, BannerResult};
pub use models::{Banner, CreateBanner, UpdateBanner};
pub use postgres::PgBannerRepository;
pub use repository::BannerRepository;
pub use service::BannerService;
