//! Orders Domain
//!
//! Turns a list of product lines into an order while keeping stock honest.
//! Placement locks product rows in ascending id order so concurrent orders
//! for overlapping products never deadlock, and a product can never be sold
//! below zero stock.
//!
//! ```text
//! pending ──► shipping ──► delivered
//!    │            │
//!    └────────────┴──► cancelled   (stock restored)
//! ```
//!
//! Committed orders are announced through [`domain_notifications::OrderNotifier`].
//! [`postgres::place_order_in_txn`] is shared with cart checkout so both paths
//! follow the same locking rules.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use models::{
    CreateOrderRequest, Customer, NewOrder, Order, OrderItem, OrderLineRequest, OrderStatus,
};
pub use postgres::{PgOrderRepository, find_customer, place_order_in_txn};
pub use repository::OrderRepository;
pub use service::OrderService;
