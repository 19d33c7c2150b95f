//! Cart Domain
//!
//! A per-user basket of products. Adding a product already in the cart sums
//! the quantities, and no line may exceed the product's stock. Checkout goes
//! through the same placement transaction as a direct order and empties the
//! cart before committing, so a failed checkout leaves the cart untouched.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CartError, CartResult};
pub use models::{AddToCart, CartLine, CartView, CheckoutRequest, UpdateCartItem};
pub use postgres::PgCartRepository;
pub use repository::CartRepository;
pub use service::CartService;
