//! Catalog Domain
//!
//! The storefront: a category tree, tags, products with stock and ratings,
//! customer reviews, and the FAQ page.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← public reads, specialist-only writes
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← tree integrity, reference checks, search, ownership
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← CatalogRepository trait + PgCatalogRepository
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Entity    │  ← SeaORM models for the catalog tables
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_catalog::{handlers, CatalogService, PgCatalogRepository};
//!
//! let service = CatalogService::new(PgCatalogRepository::new(db));
//! let router = handlers::router(service, jwt_auth);
//! ```
//!
//! Other domains read products through [`entity::product`]: the cart and
//! orders lock and decrement `total`, users list favorites.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use models::{
    AgeRange, Category, CategoryInput, CategoryTree, Comment, CommentInput, Faq, FaqInput,
    Product, ProductDetail, ProductFilter, ProductInput, ProductSummary, Tag, TagInput,
};
pub use postgres::PgCatalogRepository;
pub use repository::CatalogRepository;
pub use service::CatalogService;
